use tracing::{debug, info};

use super::QuizAttemptService;
use super::finish::{enrollment_of, load_attempt, load_open_attempt, load_quiz, total_score};
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::quizzes::{
    entities::{QuizAttempt, QuizAttemptAnswer, QuizAttemptStatus},
    requests::{GradeAnswerRequest, SubmitAnswerRequest},
};
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::services::enrollments::recompute::recompute_locked;
use crate::utils::LockKey;

pub async fn submit_answer(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
    question_id: i64,
    answer: SubmitAnswerRequest,
) -> Result<QuizAttemptAnswer> {
    let ctx = service.ctx();
    let enrollment_id = enrollment_of(ctx, attempt_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (attempt, quiz) = load_open_attempt(ctx, principal, attempt_id).await?;
    let question = quiz.question(question_id).ok_or_else(|| {
        LmsError::not_found(format!("question {question_id} in quiz {}", quiz.id))
    })?;

    let mut selected = answer.selected_option_ids;
    selected.sort_unstable();
    selected.dedup();
    let text_answer = answer.text_answer.filter(|t| !t.trim().is_empty());
    question.validate_answer(&selected, text_answer.as_deref())?;

    let score = question.auto_grade(&selected);
    let saved = ctx
        .storage
        .upsert_attempt_answer(&QuizAttemptAnswer {
            id: 0,
            attempt_id: attempt.id,
            question_id,
            selected_option_ids: selected,
            text_answer,
            score,
            is_graded: score.is_some(),
            graded_by: None,
            feedback: None,
            answered_at: ctx.now(),
        })
        .await?;

    debug!(
        "Answer saved for attempt {} question {} (auto score {:?})",
        attempt.id, question_id, score
    );
    Ok(saved)
}

/// 人工评分；全部答案评完后作答进入 GRADED 并重算选课
pub async fn grade_answer(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
    question_id: i64,
    grade: GradeAnswerRequest,
) -> Result<QuizAttempt> {
    principal.ensure_staff()?;
    let ctx = service.ctx();
    let enrollment_id = enrollment_of(ctx, attempt_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let mut attempt = load_attempt(ctx, attempt_id).await?;
    if !matches!(
        attempt.status,
        QuizAttemptStatus::Submitted | QuizAttemptStatus::Graded
    ) {
        return Err(LmsError::invalid_transition(format!(
            "quiz attempt {} is {} and cannot be graded",
            attempt.id, attempt.status
        )));
    }
    let enrollment = load_locked(ctx, enrollment_id).await?;
    require_active(&enrollment)?;

    let quiz = load_quiz(ctx, attempt.quiz_id).await?;
    ctx.ensure_teaches_version(principal, quiz.course_version_id)
        .await?;
    let question = quiz.question(question_id).ok_or_else(|| {
        LmsError::not_found(format!("question {question_id} in quiz {}", quiz.id))
    })?;
    if !grade.score.is_finite() || grade.score < 0.0 || grade.score > question.points {
        return Err(LmsError::validation(format!(
            "score {} is outside 0..={} for question {question_id}",
            grade.score, question.points
        )));
    }

    let mut answers = ctx.storage.list_attempt_answers(attempt_id).await?;
    let answer = answers
        .iter_mut()
        .find(|a| a.question_id == question_id)
        .ok_or_else(|| {
            LmsError::not_found(format!(
                "answer to question {question_id} in attempt {attempt_id}"
            ))
        })?;
    answer.score = Some(grade.score);
    answer.is_graded = true;
    answer.graded_by = Some(principal.account_id);
    answer.feedback = grade.feedback;
    let saved = ctx.storage.upsert_attempt_answer(answer).await?;
    *answer = saved;

    if answers.iter().any(|a| !a.is_graded) {
        return Ok(attempt);
    }

    let newly_graded = attempt.status == QuizAttemptStatus::Submitted;
    attempt.total_score = Some(total_score(&quiz, &answers));
    if newly_graded {
        attempt.transition_to(QuizAttemptStatus::Graded, ctx.now())?;
    } else {
        attempt.updated_at = ctx.now();
    }
    let saved = ctx.storage.update_quiz_attempt(&attempt).await?;

    info!(
        "Quiz attempt {} graded by {}: {:?}",
        saved.id, principal.account_id, saved.total_score
    );
    if newly_graded {
        ctx.publish(
            Some(principal.account_id),
            DomainEvent::QuizAttemptFinished {
                attempt_id: saved.id,
                quiz_id: saved.quiz_id,
                status: saved.status.to_string(),
                total_score: saved.total_score,
            },
        );
    }

    recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
    Ok(saved)
}
