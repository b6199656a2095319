use tracing::info;

use super::QuizAttemptService;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::quizzes::entities::{Quiz, QuizAttempt, QuizAttemptAnswer, QuizAttemptStatus};
use crate::services::EngineContext;
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::services::enrollments::recompute::recompute_locked;
use crate::utils::LockKey;
use crate::utils::score::round2;

/// 作答所属选课，用于加锁
pub(crate) async fn enrollment_of(ctx: &EngineContext, attempt_id: i64) -> Result<i64> {
    Ok(load_attempt(ctx, attempt_id).await?.enrollment_id)
}

pub(crate) async fn load_attempt(ctx: &EngineContext, attempt_id: i64) -> Result<QuizAttempt> {
    ctx.storage
        .get_quiz_attempt(attempt_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("quiz attempt {attempt_id}")))
}

pub(crate) async fn load_quiz(ctx: &EngineContext, quiz_id: i64) -> Result<Quiz> {
    ctx.storage
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("quiz {quiz_id}")))
}

/// 读取可写的作答，调用方需持有选课锁
///
/// 已超时的作答在这里迁移到 EXPIRED 并返回 AttemptExpired。
pub(crate) async fn load_open_attempt(
    ctx: &EngineContext,
    principal: &Principal,
    attempt_id: i64,
) -> Result<(QuizAttempt, Quiz)> {
    let attempt = load_attempt(ctx, attempt_id).await?;
    principal.ensure_owner(attempt.student_id)?;
    attempt.ensure_in_progress()?;

    let enrollment = load_locked(ctx, attempt.enrollment_id).await?;
    require_active(&enrollment)?;

    let quiz = load_quiz(ctx, attempt.quiz_id).await?;
    if quiz.is_overdue(attempt.started_at, ctx.now()) {
        let expired = expire_attempt_locked(ctx, attempt, Some(principal.account_id)).await?;
        return Err(LmsError::attempt_expired(format!(
            "quiz attempt {} exceeded the {} minute time limit",
            expired.id,
            quiz.time_limit_minutes.unwrap_or_default()
        )));
    }
    Ok((attempt, quiz))
}

/// 超时作答迁移到 EXPIRED，调用方需持有选课锁
pub(crate) async fn expire_attempt_locked(
    ctx: &EngineContext,
    mut attempt: QuizAttempt,
    actor_id: Option<i64>,
) -> Result<QuizAttempt> {
    attempt.transition_to(QuizAttemptStatus::Expired, ctx.now())?;
    let saved = ctx.storage.update_quiz_attempt(&attempt).await?;
    info!(
        "Quiz attempt {} of student {} expired",
        saved.id, saved.student_id
    );
    ctx.publish(
        actor_id,
        DomainEvent::QuizAttemptExpired {
            attempt_id: saved.id,
            quiz_id: saved.quiz_id,
        },
    );
    Ok(saved)
}

/// 原始总分，不超过测验满分
pub(crate) fn total_score(quiz: &Quiz, answers: &[QuizAttemptAnswer]) -> f64 {
    let sum: f64 = answers.iter().filter_map(|a| a.score).sum();
    round2(sum.clamp(0.0, quiz.max_points()))
}

pub async fn finish(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
) -> Result<QuizAttempt> {
    let ctx = service.ctx();
    let enrollment_id = enrollment_of(ctx, attempt_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    // 重复结束已交卷的作答：原样返回，已评分的再重算一次选课
    let current = load_attempt(ctx, attempt_id).await?;
    if matches!(
        current.status,
        QuizAttemptStatus::Submitted | QuizAttemptStatus::Graded
    ) {
        principal.ensure_owner(current.student_id)?;
        require_active(&load_locked(ctx, enrollment_id).await?)?;
        if current.status == QuizAttemptStatus::Graded {
            recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
        }
        return Ok(current);
    }

    let (mut attempt, quiz) = load_open_attempt(ctx, principal, attempt_id).await?;
    let answers = ctx.storage.list_attempt_answers(attempt_id).await?;

    // 有主观题未评分时等待人工评分；未作答的题目按 0 分
    let needs_review = answers.iter().any(|a| !a.is_graded);
    if needs_review {
        attempt.transition_to(QuizAttemptStatus::Submitted, ctx.now())?;
    } else {
        attempt.total_score = Some(total_score(&quiz, &answers));
        attempt.transition_to(QuizAttemptStatus::Graded, ctx.now())?;
    }
    let saved = ctx.storage.update_quiz_attempt(&attempt).await?;

    info!(
        "Quiz attempt {} finished as {} (score {:?})",
        saved.id, saved.status, saved.total_score
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::QuizAttemptFinished {
            attempt_id: saved.id,
            quiz_id: saved.quiz_id,
            status: saved.status.to_string(),
            total_score: saved.total_score,
        },
    );

    if saved.status == QuizAttemptStatus::Graded {
        recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
    }
    Ok(saved)
}

pub async fn abandon(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
) -> Result<QuizAttempt> {
    let ctx = service.ctx();
    let enrollment_id = enrollment_of(ctx, attempt_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (mut attempt, _) = load_open_attempt(ctx, principal, attempt_id).await?;
    attempt.transition_to(QuizAttemptStatus::Cancelled, ctx.now())?;
    let saved = ctx.storage.update_quiz_attempt(&attempt).await?;
    info!("Quiz attempt {} abandoned", saved.id);
    Ok(saved)
}
