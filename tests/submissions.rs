mod common;

use chrono::Duration;

use common::*;
use rust_lms_next::LmsError;
use rust_lms_next::events::DomainEvent;
use rust_lms_next::models::Principal;
use rust_lms_next::models::assignments::{
    entities::{Assignment, SubmissionStatus},
    requests::GradeSubmissionRequest,
};

const ASSIGNMENT: i64 = 40;

fn grade(score: f64) -> GradeSubmissionRequest {
    GradeSubmissionRequest {
        score,
        feedback: Some("see comments".into()),
    }
}

fn setup(assignment: Assignment) -> Harness {
    let h = Harness::new();
    seed_course(
        &h.storage,
        1,
        CourseSpec {
            pass_score: 9.0,
            ..Default::default()
        },
        1,
        60,
    );
    h.storage.add_assignment(assignment);
    h
}

#[tokio::test]
async fn test_pending_submission_is_edited_in_place() {
    let h = setup(assignment(ASSIGNMENT, 1, 20.0));
    h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);
    let submissions = &h.engine.submissions;

    let first = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "draft".into())
        .await
        .unwrap();
    assert_eq!(first.attempt_number, 1);
    assert_eq!(first.status, SubmissionStatus::Pending);

    let edited = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "final answer".into())
        .await
        .unwrap();
    assert_eq!(edited.id, first.id);
    assert_eq!(edited.content, "final answer");

    let err = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "   ".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));

    // 待批改时不能重交
    let err = submissions
        .resubmit(&student, ASSIGNMENT, STUDENT, "again".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_grading_updates_enrollment_score() {
    let h = setup(assignment(ASSIGNMENT, 1, 20.0));
    let enrollment = h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);
    let teacher = Principal::teacher(TEACHER);
    let submissions = &h.engine.submissions;

    let submission = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "essay".into())
        .await
        .unwrap();

    let err = submissions.grade(&student, submission.id, grade(15.0)).await.unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));
    let err = submissions.grade(&teacher, submission.id, grade(25.0)).await.unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));
    let err = submissions
        .grade(&Principal::teacher(OTHER_TEACHER), submission.id, grade(15.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));

    let mut events = h.engine.events().subscribe();
    let graded = submissions.grade(&teacher, submission.id, grade(15.0)).await.unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.score, Some(15.0));
    assert_eq!(graded.graded_by, Some(TEACHER));
    assert!(matches!(
        events.try_recv().unwrap().event,
        DomainEvent::SubmissionGraded { score, .. } if score == 15.0
    ));
    assert_eq!(h.enrollment(enrollment.id).await.average_score, Some(7.5));

    // 允许重新批改
    let regraded = submissions.grade(&teacher, submission.id, grade(17.0)).await.unwrap();
    assert_eq!(regraded.score, Some(17.0));
    assert_eq!(h.enrollment(enrollment.id).await.average_score, Some(8.5));

    let best = submissions
        .best_submission(&student, ASSIGNMENT, STUDENT)
        .await
        .unwrap();
    assert_eq!(best.map(|s| s.id), Some(submission.id));
}

#[tokio::test]
async fn test_resubmission_chain_and_limit() {
    let mut limited = assignment(ASSIGNMENT, 1, 10.0);
    limited.max_attempts = Some(2);
    let h = setup(limited);
    h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);
    let teacher = Principal::teacher(TEACHER);
    let submissions = &h.engine.submissions;

    let err = submissions
        .resubmit(&student, ASSIGNMENT, STUDENT, "too early".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::NotFound(_)));

    let first = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "v1".into())
        .await
        .unwrap();
    let rejected = submissions
        .reject(&teacher, first.id, Some("off topic".into()))
        .await
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);

    let err = submissions.grade(&teacher, first.id, grade(5.0)).await.unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));
    let err = submissions
        .submit(&student, ASSIGNMENT, STUDENT, "v1 again".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));

    let second = submissions
        .resubmit(&student, ASSIGNMENT, STUDENT, "v2".into())
        .await
        .unwrap();
    assert_eq!(second.attempt_number, 2);
    assert_eq!(second.previous_submission_id, Some(first.id));

    let err = submissions.reject(&teacher, first.id, None).await.unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));

    submissions.grade(&teacher, second.id, grade(6.0)).await.unwrap();
    let err = submissions
        .resubmit(&student, ASSIGNMENT, STUDENT, "v3".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::AttemptLimitReached(_)));

    let history = submissions
        .list_submissions(&teacher, ASSIGNMENT, STUDENT)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_past_due_assignment_rejects_submissions() {
    let mut due = assignment(ASSIGNMENT, 1, 10.0);
    let h = Harness::new();
    due.due_at = Some(h.now() + Duration::days(1));
    seed_course(&h.storage, 1, CourseSpec::default(), 1, 60);
    h.storage.add_assignment(due);
    h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);

    h.engine
        .submissions
        .submit(&student, ASSIGNMENT, STUDENT, "on time".into())
        .await
        .unwrap();

    h.clock.advance(Duration::days(2));
    let err = h
        .engine
        .submissions
        .submit(&student, ASSIGNMENT, STUDENT, "late edit".into())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));
}

#[tokio::test]
async fn test_bulk_grading_and_passing_rate() {
    let h = setup(assignment(ASSIGNMENT, 1, 20.0));
    let third_student = OTHER_STUDENT + 1;
    let teacher = Principal::teacher(TEACHER);
    let submissions = &h.engine.submissions;

    let mut ids = Vec::new();
    for student_id in [STUDENT, OTHER_STUDENT, third_student] {
        h.enroll(student_id, 1).await;
        let submission = submissions
            .submit(&Principal::student(student_id), ASSIGNMENT, student_id, "work".into())
            .await
            .unwrap();
        ids.push(submission.id);
    }
    assert_eq!(submissions.passing_rate(&teacher, ASSIGNMENT).await.unwrap(), None);

    let err = submissions
        .bulk_grade(&Principal::student(STUDENT), &ids, grade(10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));
    let err = submissions
        .bulk_grade(&Principal::teacher(OTHER_TEACHER), &ids, grade(10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));
    let err = submissions.bulk_grade(&teacher, &[], grade(10.0)).await.unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));
    let err = submissions
        .bulk_grade(&teacher, &[ids[0], 9999], grade(10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::NotFound(_)));
    let err = submissions.bulk_grade(&teacher, &ids, grade(25.0)).await.unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));

    // 任何一条校验失败都不批改
    let untouched = submissions
        .list_submissions(&teacher, ASSIGNMENT, STUDENT)
        .await
        .unwrap();
    assert_eq!(untouched[0].status, SubmissionStatus::Pending);

    let graded = submissions
        .bulk_grade(&teacher, &[ids[0], ids[1], ids[0]], grade(10.0))
        .await
        .unwrap();
    assert_eq!(graded.len(), 2);
    assert!(graded.iter().all(|s| s.score == Some(10.0) && s.graded_by == Some(TEACHER)));
    assert_eq!(
        submissions.passing_rate(&teacher, ASSIGNMENT).await.unwrap(),
        Some(0.0)
    );

    submissions.grade(&teacher, ids[2], grade(19.0)).await.unwrap();
    assert_eq!(
        submissions.passing_rate(&teacher, ASSIGNMENT).await.unwrap(),
        Some(33.33)
    );
    let err = submissions
        .passing_rate(&Principal::teacher(OTHER_TEACHER), ASSIGNMENT)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));
}
