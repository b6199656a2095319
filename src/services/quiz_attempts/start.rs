use tracing::info;

use super::QuizAttemptService;
use super::finish::expire_attempt_locked;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::quizzes::{
    entities::{QuizAttempt, QuizAttemptStatus},
    requests::NewQuizAttempt,
};
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::services::grading::summary::eligibility_for;
use crate::utils::LockKey;

pub async fn start(
    service: &QuizAttemptService,
    principal: &Principal,
    quiz_id: i64,
    student_id: i64,
) -> Result<QuizAttempt> {
    principal.ensure_owner(student_id)?;
    let ctx = service.ctx();

    let quiz = ctx
        .storage
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("quiz {quiz_id}")))?;

    let _quiz_guard = ctx
        .locks
        .lock(LockKey::QuizStudent {
            quiz_id,
            student_id,
        })
        .await;

    let candidate = ctx
        .storage
        .find_latest_enrollment_for_version(student_id, quiz.course_version_id)
        .await?
        .ok_or_else(|| {
            LmsError::not_found(format!(
                "enrollment of student {student_id} in course version {}",
                quiz.course_version_id
            ))
        })?;
    let _enrollment_guard = ctx.locks.lock(LockKey::Enrollment(candidate.id)).await;
    let enrollment = load_locked(ctx, candidate.id).await?;
    require_active(&enrollment)?;

    let now = ctx.now();
    let attempts = ctx.storage.list_quiz_attempts(quiz_id, student_id).await?;

    // 已超时的未交卷作答先过期，不阻塞新的作答
    if let Some(open) = attempts
        .iter()
        .find(|a| a.status == QuizAttemptStatus::InProgress)
    {
        if !quiz.is_overdue(open.started_at, now) {
            return Err(LmsError::attempt_in_progress(format!(
                "attempt {} of quiz {quiz_id} is still in progress",
                open.attempt_number
            )));
        }
        expire_attempt_locked(ctx, open.clone(), Some(principal.account_id)).await?;
    }

    if let Some(limit) = quiz.attempt_limit()
        && attempts.len() as i64 >= limit
    {
        return Err(LmsError::attempt_limit_reached(format!(
            "quiz {quiz_id} allows {limit} attempt(s), {} used",
            attempts.len()
        )));
    }

    if quiz.is_final_exam {
        let eligibility = eligibility_for(ctx, &enrollment).await?;
        if !eligibility.is_eligible {
            return Err(LmsError::not_eligible(
                eligibility
                    .reason
                    .unwrap_or_else(|| "final exam requirements not met".to_string()),
            ));
        }
    }

    let attempt_number = attempts
        .iter()
        .map(|a| a.attempt_number)
        .max()
        .unwrap_or(0)
        + 1;

    let attempt = ctx
        .storage
        .create_quiz_attempt(NewQuizAttempt {
            quiz_id,
            student_id,
            enrollment_id: enrollment.id,
            attempt_number,
            started_at: now,
            shuffle_seed: rand::random::<u64>(),
        })
        .await?;

    info!(
        "Student {} started attempt {} of quiz {}",
        student_id, attempt_number, quiz_id
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::QuizAttemptStarted {
            attempt_id: attempt.id,
            quiz_id,
            attempt_number,
        },
    );
    Ok(attempt)
}
