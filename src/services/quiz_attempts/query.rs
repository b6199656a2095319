use chrono::{DateTime, Utc};

use super::QuizAttemptService;
use super::finish::{load_attempt, load_quiz};
use crate::errors::Result;
use crate::models::Principal;
use crate::models::quizzes::entities::{Quiz, QuizAttempt, QuizAttemptStatus};

/// 不限时返回空；已结束的作答为 0
pub fn remaining_for(quiz: &Quiz, attempt: &QuizAttempt, now: DateTime<Utc>) -> Option<i64> {
    let deadline = quiz.deadline(attempt.started_at)?;
    if attempt.status != QuizAttemptStatus::InProgress {
        return Some(0);
    }
    Some((deadline - now).num_seconds().max(0))
}

pub async fn remaining_seconds(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
) -> Result<Option<i64>> {
    let ctx = service.ctx();
    let attempt = load_attempt(ctx, attempt_id).await?;
    principal.ensure_can_view(attempt.student_id)?;
    let quiz = load_quiz(ctx, attempt.quiz_id).await?;
    Ok(remaining_for(&quiz, &attempt, ctx.now()))
}

pub async fn best_score(
    service: &QuizAttemptService,
    principal: &Principal,
    quiz_id: i64,
    student_id: i64,
) -> Result<Option<f64>> {
    let attempts = list_attempts(service, principal, quiz_id, student_id).await?;
    Ok(attempts
        .iter()
        .filter(|a| a.status == QuizAttemptStatus::Graded)
        .filter_map(|a| a.total_score)
        .fold(None, |best: Option<f64>, score| {
            Some(best.map_or(score, |b| b.max(score)))
        }))
}

pub async fn list_attempts(
    service: &QuizAttemptService,
    principal: &Principal,
    quiz_id: i64,
    student_id: i64,
) -> Result<Vec<QuizAttempt>> {
    principal.ensure_can_view(student_id)?;
    let ctx = service.ctx();
    load_quiz(ctx, quiz_id).await?;
    ctx.storage.list_quiz_attempts(quiz_id, student_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quiz(limit: Option<i32>) -> Quiz {
        Quiz {
            id: 1,
            course_version_id: 1,
            lesson_id: None,
            title: "timed".into(),
            max_attempts: None,
            time_limit_minutes: limit,
            passing_score: None,
            randomize_questions: false,
            randomize_options: false,
            total_points: 10.0,
            is_final_exam: false,
            questions: vec![],
        }
    }

    fn attempt(status: QuizAttemptStatus, started_at: DateTime<Utc>) -> QuizAttempt {
        QuizAttempt {
            id: 1,
            quiz_id: 1,
            student_id: 1,
            enrollment_id: 1,
            attempt_number: 1,
            status,
            started_at,
            finished_at: None,
            total_score: None,
            shuffle_seed: 0,
            updated_at: started_at,
        }
    }

    #[test]
    fn test_remaining_seconds() {
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let open = attempt(QuizAttemptStatus::InProgress, start);

        assert_eq!(remaining_for(&quiz(None), &open, start), None);
        assert_eq!(
            remaining_for(&quiz(Some(10)), &open, start + Duration::minutes(4)),
            Some(360)
        );
        assert_eq!(
            remaining_for(&quiz(Some(10)), &open, start + Duration::minutes(11)),
            Some(0)
        );

        let graded = attempt(QuizAttemptStatus::Graded, start);
        assert_eq!(remaining_for(&quiz(Some(10)), &graded, start), Some(0));
    }
}
