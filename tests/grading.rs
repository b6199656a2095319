mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::*;
use rust_lms_next::collaborators::CertificateIssuer;
use rust_lms_next::config::{LearningConfig, ScoreAggregation};
use rust_lms_next::models::Principal;
use rust_lms_next::models::certificates::entities::Certificate;
use rust_lms_next::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use rust_lms_next::services::EngineContext;
use rust_lms_next::storage::{MemoryStorage, Storage};
use rust_lms_next::utils::fixed_clock;
use rust_lms_next::{LearningEngine, LmsError};

const COURSEWORK_QUIZ: i64 = 7;
const FINAL_EXAM: i64 = 8;

/// 10 个课时，及格 8 分，期末权重 0.6，期末需要 80% 进度
fn seed_graded_course(storage: &MemoryStorage) {
    seed_course(
        storage,
        1,
        CourseSpec {
            pass_score: 8.0,
            final_weight: 0.6,
            min_progress_pct: 80.0,
            ..Default::default()
        },
        10,
        300,
    );
    storage.add_quiz(choice_quiz(COURSEWORK_QUIZ, 1, 10));
    let mut exam = choice_quiz(FINAL_EXAM, 1, 20);
    exam.is_final_exam = true;
    storage.add_quiz(exam);
}

async fn complete_lessons(h: &Harness, enrollment_id: i64, count: usize) {
    for i in 0..count {
        h.engine
            .progress
            .mark_complete(&Principal::student(STUDENT), enrollment_id, lesson_id(1, i))
            .await
            .unwrap();
    }
}

async fn quiz(h: &Harness, quiz_id: i64) -> rust_lms_next::models::quizzes::entities::Quiz {
    h.storage.get_quiz(quiz_id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_passing_course_completes_with_certificate() {
    let h = Harness::new();
    seed_graded_course(&h.storage);
    let enrollment = h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);

    complete_lessons(&h, enrollment.id, 8).await;
    take_quiz(&h, STUDENT, &quiz(&h, COURSEWORK_QUIZ).await, 9).await;

    // 期末缺考按 0 分计，尚未通过
    let pending = h.enrollment(enrollment.id).await;
    assert_eq!(pending.status, EnrollmentStatus::Enrolled);
    assert_eq!(pending.completion_percentage, 80.0);
    assert_eq!(pending.average_score, Some(3.6));

    let mut events = h.engine.events().subscribe();
    let exam = take_quiz(&h, STUDENT, &quiz(&h, FINAL_EXAM).await, 17).await;
    assert_eq!(exam.total_score, Some(17.0));

    let summary = h
        .engine
        .grading
        .grade_summary(&student, enrollment.id)
        .await
        .unwrap();
    assert_eq!(summary.coursework_average, Some(9.0));
    assert_eq!(summary.final_exam_score, Some(8.5));
    assert_eq!(summary.final_score, 8.7);
    assert!(summary.is_passing);

    let completed = h.enrollment(enrollment.id).await;
    assert_eq!(completed.status, EnrollmentStatus::Completed);
    assert_eq!(completed.average_score, Some(8.7));
    assert_eq!(completed.final_exam_score, Some(8.5));
    assert!(completed.completed_at.is_some());
    assert!(completed.certificate_issued);

    let certificate = h
        .storage
        .get_certificate_by_enrollment(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(completed.certificate_id, Some(certificate.id));
    assert_eq!(certificate.final_score, 8.7);
    assert!(certificate.code.starts_with("CERT-"));

    let names: Vec<&str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.event.name())
        .collect();
    assert!(names.contains(&"enrollment_completed"));
    assert!(names.contains(&"certificate_issued"));

    assert!(h.engine.grading.is_passing(&student, enrollment.id).await.unwrap());
    assert_eq!(
        h.engine.grading.compute_final_score(&student, enrollment.id).await.unwrap(),
        8.7
    );
}

#[tokio::test]
async fn test_final_exam_requires_progress() {
    let h = Harness::new();
    seed_graded_course(&h.storage);
    let enrollment = h.enroll(STUDENT, 1).await;
    let student = Principal::student(STUDENT);

    complete_lessons(&h, enrollment.id, 7).await;
    let eligibility = h
        .engine
        .grading
        .check_final_exam_eligibility(&student, enrollment.id)
        .await
        .unwrap();
    assert!(!eligibility.is_eligible);
    assert_eq!(eligibility.current_progress_pct, 70.0);
    assert_eq!(eligibility.required_progress_pct, 80.0);
    assert!(
        eligibility
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("insufficient progress"))
    );

    let err = h
        .engine
        .quizzes
        .start(&student, FINAL_EXAM, STUDENT)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::NotEligible(_)));

    complete_lessons(&h, enrollment.id, 8).await;
    assert!(
        h.engine
            .grading
            .check_final_exam_eligibility(&student, enrollment.id)
            .await
            .unwrap()
            .is_eligible
    );
    h.engine
        .quizzes
        .start(&student, FINAL_EXAM, STUDENT)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_failing_score_keeps_enrollment_open() {
    let h = Harness::new();
    seed_graded_course(&h.storage);
    let enrollment = h.enroll(STUDENT, 1).await;

    complete_lessons(&h, enrollment.id, 10).await;
    take_quiz(&h, STUDENT, &quiz(&h, COURSEWORK_QUIZ).await, 6).await;
    take_quiz(&h, STUDENT, &quiz(&h, FINAL_EXAM).await, 14).await;

    // 0.4 × 6.0 + 0.6 × 7.0 = 6.6 < 8
    let current = h.enrollment(enrollment.id).await;
    assert_eq!(current.status, EnrollmentStatus::Enrolled);
    assert_eq!(current.average_score, Some(6.6));
    assert!(!current.certificate_issued);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let h = Harness::new();
    seed_graded_course(&h.storage);
    let enrollment = h.enroll(STUDENT, 1).await;

    complete_lessons(&h, enrollment.id, 3).await;
    take_quiz(&h, STUDENT, &quiz(&h, COURSEWORK_QUIZ).await, 5).await;

    let before = h.enrollment(enrollment.id).await;
    let first = h.engine.grading.recompute(enrollment.id).await.unwrap();
    let second = h
        .engine
        .enrollments
        .recompute_completion(enrollment.id)
        .await
        .unwrap();

    assert_eq!(first, before);
    assert_eq!(second, before);
    assert_eq!(second.completion_percentage, 30.0);
    assert_eq!(second.average_score, Some(2.0));
}

#[tokio::test]
async fn test_recompute_rebuilds_cleared_fields() {
    let h = Harness::new();
    seed_graded_course(&h.storage);
    let enrollment = h.enroll(STUDENT, 1).await;

    complete_lessons(&h, enrollment.id, 9).await;
    take_quiz(&h, STUDENT, &quiz(&h, COURSEWORK_QUIZ).await, 8).await;
    take_quiz(&h, STUDENT, &quiz(&h, FINAL_EXAM).await, 12).await;
    let before = h.enrollment(enrollment.id).await;
    assert_eq!(before.final_exam_score, Some(6.0));

    // 把派生字段清空后直接写回存储
    let mut cleared = before.clone();
    cleared.completion_percentage = 0.0;
    cleared.average_score = None;
    cleared.final_exam_score = None;
    h.storage.update_enrollment(&cleared).await.unwrap();
    assert_eq!(h.enrollment(enrollment.id).await.average_score, None);

    let rebuilt = h
        .engine
        .enrollments
        .recompute_completion(enrollment.id)
        .await
        .unwrap();
    assert_eq!(rebuilt.completion_percentage, before.completion_percentage);
    assert_eq!(rebuilt.average_score, before.average_score);
    assert_eq!(rebuilt.final_exam_score, before.final_exam_score);
    assert_eq!(rebuilt.status, before.status);
    assert_eq!(h.enrollment(enrollment.id).await, rebuilt);
}

#[tokio::test]
async fn test_zero_pass_score_completion_keeps_score() {
    let h = Harness::new();
    seed_course(
        &h.storage,
        1,
        CourseSpec {
            pass_score: 0.0,
            ..Default::default()
        },
        2,
        60,
    );
    let enrollment = h.enroll(STUDENT, 1).await;

    h.engine
        .progress
        .mark_complete(&Principal::student(STUDENT), enrollment.id, lesson_id(1, 0))
        .await
        .unwrap();

    let completed = h.enrollment(enrollment.id).await;
    assert_eq!(completed.status, EnrollmentStatus::Completed);
    assert_eq!(completed.average_score, Some(0.0));
    assert!(completed.certificate_issued);

    let certificate = h
        .storage
        .get_certificate_by_enrollment(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(certificate.final_score, 0.0);
}

#[tokio::test]
async fn test_best_attempt_aggregation() {
    let policy = LearningConfig {
        score_aggregation: ScoreAggregation::BestAttempt,
        ..Default::default()
    };
    let all = Harness::new();
    let best = Harness::with_policy(policy);

    let mut ids = Vec::new();
    for h in [&all, &best] {
        seed_course(
            &h.storage,
            1,
            CourseSpec {
                pass_score: 9.5,
                ..Default::default()
            },
            1,
            60,
        );
        let quiz = choice_quiz(COURSEWORK_QUIZ, 1, 10);
        h.storage.add_quiz(quiz.clone());
        ids.push(h.enroll(STUDENT, 1).await.id);
        take_quiz(h, STUDENT, &quiz, 6).await;
        take_quiz(h, STUDENT, &quiz, 9).await;
    }

    let student = Principal::student(STUDENT);
    let (all_id, best_id) = (ids[0], ids[1]);

    assert_eq!(
        all.engine.grading.compute_average_score(&student, all_id).await.unwrap(),
        Some(7.5)
    );
    assert_eq!(
        best.engine.grading.compute_average_score(&student, best_id).await.unwrap(),
        Some(9.0)
    );
}

struct FailingIssuer;

#[async_trait]
impl CertificateIssuer for FailingIssuer {
    async fn issue(
        &self,
        _enrollment: &Enrollment,
        _now: DateTime<Utc>,
    ) -> rust_lms_next::Result<Certificate> {
        Err(LmsError::collaborator("certificate service unavailable"))
    }
}

#[tokio::test]
async fn test_certificate_failure_does_not_block_completion() {
    let storage = Arc::new(MemoryStorage::new());
    seed_course(&storage, 1, CourseSpec::default(), 1, 60);
    let context = EngineContext::builder(storage.clone())
        .clock(fixed_clock())
        .certificate_issuer(Arc::new(FailingIssuer))
        .build();
    let engine = LearningEngine::new(context);
    let student = Principal::student(STUDENT);

    let mut events = engine.events().subscribe();
    let enrollment = engine.enrollments.enroll(&student, STUDENT, 1, None).await.unwrap();
    let quiz = choice_quiz(COURSEWORK_QUIZ, 1, 2);
    storage.add_quiz(quiz.clone());

    let attempt = engine.quizzes.start(&student, quiz.id, STUDENT).await.unwrap();
    for question in &quiz.questions {
        engine
            .quizzes
            .submit_answer(
                &student,
                attempt.id,
                question.id,
                rust_lms_next::models::quizzes::requests::SubmitAnswerRequest::options([
                    option_id(question.id, 1),
                ]),
            )
            .await
            .unwrap();
    }
    engine.quizzes.finish(&student, attempt.id).await.unwrap();

    let completed = engine.enrollments.get_enrollment(&student, enrollment.id).await.unwrap();
    assert_eq!(completed.status, EnrollmentStatus::Completed);
    assert!(!completed.certificate_issued);
    assert_eq!(completed.certificate_id, None);

    let names: Vec<&str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.event.name())
        .collect();
    assert!(names.contains(&"enrollment_completed"));
    assert!(!names.contains(&"certificate_issued"));
}
