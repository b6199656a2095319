use tracing::info;

use super::SubmissionService;
use super::submit::load_assignment;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::assignments::{
    entities::{Submission, SubmissionStatus},
    requests::GradeSubmissionRequest,
};
use crate::services::EngineContext;
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::services::enrollments::recompute::recompute_locked;
use crate::utils::LockKey;

async fn load_submission(ctx: &EngineContext, submission_id: i64) -> Result<Submission> {
    ctx.storage
        .get_submission(submission_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("submission {submission_id}")))
}

pub async fn grade(
    service: &SubmissionService,
    principal: &Principal,
    submission_id: i64,
    grade: GradeSubmissionRequest,
) -> Result<Submission> {
    principal.ensure_staff()?;
    let ctx = service.ctx();
    let enrollment_id = load_submission(ctx, submission_id).await?.enrollment_id;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let mut submission = load_submission(ctx, submission_id).await?;
    if submission.status == SubmissionStatus::Rejected {
        return Err(LmsError::invalid_transition(format!(
            "submission {submission_id} was rejected and cannot be graded"
        )));
    }
    let enrollment = load_locked(ctx, enrollment_id).await?;
    require_active(&enrollment)?;

    let assignment = load_assignment(ctx, submission.assignment_id).await?;
    ctx.ensure_teaches_version(principal, assignment.course_version_id)
        .await?;
    assignment.validate_score(grade.score)?;

    let now = ctx.now();
    submission.status = SubmissionStatus::Graded;
    submission.score = Some(grade.score);
    submission.feedback = grade.feedback;
    submission.graded_by = Some(principal.account_id);
    submission.graded_at = Some(now);
    submission.updated_at = now;
    let saved = ctx.storage.update_submission(&submission).await?;

    info!(
        "Submission {} graded {} by {}",
        saved.id, grade.score, principal.account_id
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::SubmissionGraded {
            submission_id: saved.id,
            assignment_id: saved.assignment_id,
            score: grade.score,
        },
    );

    recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
    Ok(saved)
}

pub async fn reject(
    service: &SubmissionService,
    principal: &Principal,
    submission_id: i64,
    feedback: Option<String>,
) -> Result<Submission> {
    principal.ensure_staff()?;
    let ctx = service.ctx();
    let enrollment_id = load_submission(ctx, submission_id).await?.enrollment_id;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let mut submission = load_submission(ctx, submission_id).await?;
    if submission.status != SubmissionStatus::Pending {
        return Err(LmsError::invalid_transition(format!(
            "submission {submission_id} is {} and cannot be rejected",
            submission.status
        )));
    }
    let enrollment = load_locked(ctx, enrollment_id).await?;
    require_active(&enrollment)?;
    let assignment = load_assignment(ctx, submission.assignment_id).await?;
    ctx.ensure_teaches_version(principal, assignment.course_version_id)
        .await?;

    let now = ctx.now();
    submission.status = SubmissionStatus::Rejected;
    submission.feedback = feedback;
    submission.graded_by = Some(principal.account_id);
    submission.graded_at = Some(now);
    submission.updated_at = now;
    let saved = ctx.storage.update_submission(&submission).await?;

    info!("Submission {} rejected by {}", saved.id, principal.account_id);
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::SubmissionRejected {
            submission_id: saved.id,
            assignment_id: saved.assignment_id,
        },
    );
    Ok(saved)
}

/// 以同一分数批改多份提交
///
/// 先整体校验（存在、未退回、有权批改、分数合法），全部通过后逐条批改。
pub async fn bulk_grade(
    service: &SubmissionService,
    principal: &Principal,
    submission_ids: &[i64],
    grade: GradeSubmissionRequest,
) -> Result<Vec<Submission>> {
    principal.ensure_staff()?;
    let ctx = service.ctx();

    let mut ids: Vec<i64> = Vec::with_capacity(submission_ids.len());
    for id in submission_ids {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    if ids.is_empty() {
        return Err(LmsError::validation("no submissions to grade"));
    }

    let mut missing = Vec::new();
    for id in &ids {
        let Some(submission) = ctx.storage.get_submission(*id).await? else {
            missing.push(id.to_string());
            continue;
        };
        if submission.status == SubmissionStatus::Rejected {
            return Err(LmsError::invalid_transition(format!(
                "submission {id} was rejected and cannot be graded"
            )));
        }
        let assignment = load_assignment(ctx, submission.assignment_id).await?;
        ctx.ensure_teaches_version(principal, assignment.course_version_id)
            .await?;
        assignment.validate_score(grade.score)?;
    }
    if !missing.is_empty() {
        return Err(LmsError::not_found(format!(
            "submissions {}",
            missing.join(", ")
        )));
    }

    let mut graded = Vec::with_capacity(ids.len());
    for id in ids {
        graded.push(self::grade(service, principal, id, grade.clone()).await?);
    }
    info!(
        "Bulk graded {} submission(s) with {} by {}",
        graded.len(),
        grade.score,
        principal.account_id
    );
    Ok(graded)
}
