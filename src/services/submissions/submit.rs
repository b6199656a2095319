use tracing::info;

use super::SubmissionService;
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::assignments::{
    entities::{Assignment, Submission},
    requests::NewSubmission,
};
use crate::models::enrollments::entities::Enrollment;
use crate::services::EngineContext;
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::utils::LockKey;

pub(crate) async fn load_assignment(ctx: &EngineContext, assignment_id: i64) -> Result<Assignment> {
    ctx.storage
        .get_assignment(assignment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("assignment {assignment_id}")))
}

/// 作业所属课程版本下学生当前的选课，调用方随后加锁并 `load_locked`
async fn find_enrollment(
    ctx: &EngineContext,
    assignment: &Assignment,
    student_id: i64,
) -> Result<Enrollment> {
    ctx.storage
        .find_latest_enrollment_for_version(student_id, assignment.course_version_id)
        .await?
        .ok_or_else(|| {
            LmsError::not_found(format!(
                "enrollment of student {student_id} in course version {}",
                assignment.course_version_id
            ))
        })
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(LmsError::validation("submission content cannot be empty"));
    }
    Ok(())
}

pub async fn submit(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: i64,
    student_id: i64,
    content: String,
) -> Result<Submission> {
    principal.ensure_owner(student_id)?;
    validate_content(&content)?;
    let ctx = service.ctx();
    let assignment = load_assignment(ctx, assignment_id).await?;

    let candidate = find_enrollment(ctx, &assignment, student_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(candidate.id)).await;
    let enrollment = load_locked(ctx, candidate.id).await?;
    require_active(&enrollment)?;

    let now = ctx.now();
    if assignment.is_past_due(now) {
        return Err(LmsError::validation(format!(
            "assignment {assignment_id} is past due"
        )));
    }

    let submissions = ctx.storage.list_submissions(assignment_id, student_id).await?;
    match submissions.into_iter().max_by_key(|s| s.attempt_number) {
        None => {
            let created = ctx
                .storage
                .create_submission(NewSubmission {
                    assignment_id,
                    student_id,
                    enrollment_id: enrollment.id,
                    attempt_number: 1,
                    previous_submission_id: None,
                    content,
                    submitted_at: now,
                })
                .await?;
            info!(
                "Student {} submitted assignment {} (submission {})",
                student_id, assignment_id, created.id
            );
            Ok(created)
        }
        Some(latest) if latest.status.is_finalized() => Err(LmsError::invalid_transition(format!(
            "submission {} is {}, resubmit to try again",
            latest.id, latest.status
        ))),
        Some(mut pending) => {
            pending.content = content;
            pending.submitted_at = now;
            pending.updated_at = now;
            ctx.storage.update_submission(&pending).await
        }
    }
}

pub async fn resubmit(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: i64,
    student_id: i64,
    content: String,
) -> Result<Submission> {
    principal.ensure_owner(student_id)?;
    validate_content(&content)?;
    let ctx = service.ctx();
    let assignment = load_assignment(ctx, assignment_id).await?;

    let candidate = find_enrollment(ctx, &assignment, student_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(candidate.id)).await;
    let enrollment = load_locked(ctx, candidate.id).await?;
    require_active(&enrollment)?;

    let now = ctx.now();
    if assignment.is_past_due(now) {
        return Err(LmsError::validation(format!(
            "assignment {assignment_id} is past due"
        )));
    }

    let submissions = ctx.storage.list_submissions(assignment_id, student_id).await?;
    let latest = submissions
        .iter()
        .max_by_key(|s| s.attempt_number)
        .ok_or_else(|| {
            LmsError::not_found(format!(
                "no submission of assignment {assignment_id} to resubmit"
            ))
        })?;
    if !latest.status.is_finalized() {
        return Err(LmsError::invalid_transition(format!(
            "submission {} is still pending review",
            latest.id
        )));
    }
    if let Some(limit) = assignment.attempt_limit()
        && submissions.len() as i64 >= limit
    {
        return Err(LmsError::attempt_limit_reached(format!(
            "assignment {assignment_id} allows {limit} submission(s), {} used",
            submissions.len()
        )));
    }

    let created = ctx
        .storage
        .create_submission(NewSubmission {
            assignment_id,
            student_id,
            enrollment_id: enrollment.id,
            attempt_number: latest.attempt_number + 1,
            previous_submission_id: Some(latest.id),
            content,
            submitted_at: now,
        })
        .await?;
    info!(
        "Student {} resubmitted assignment {} as attempt {}",
        student_id, assignment_id, created.attempt_number
    );
    Ok(created)
}
