use tracing::info;

use super::EnrollmentService;
use super::guard::{load_locked, update_with_retry};
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::utils::LockKey;

pub async fn cancel(
    service: &EnrollmentService,
    principal: &Principal,
    enrollment_id: i64,
    reason: &str,
) -> Result<Enrollment> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let current = load_locked(ctx, enrollment_id).await?;
    principal.ensure_owner(current.student_id)?;

    let now = ctx.now();
    let enrollment = update_with_retry(ctx, enrollment_id, |enrollment| {
        enrollment.transition_to(EnrollmentStatus::Cancelled, now)?;
        enrollment.cancellation_reason = Some(reason.to_string());
        Ok(())
    })
    .await?;

    info!("Enrollment {} cancelled: {}", enrollment_id, reason);
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::EnrollmentCancelled {
            enrollment_id,
            reason: reason.to_string(),
        },
    );
    Ok(enrollment)
}

pub async fn ban(
    service: &EnrollmentService,
    principal: &Principal,
    enrollment_id: i64,
    reason: &str,
) -> Result<Enrollment> {
    principal.ensure_staff()?;
    if reason.trim().is_empty() {
        return Err(LmsError::validation("ban reason must not be empty"));
    }

    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    // 教师只能封禁自己课程的选课
    let current = load_locked(ctx, enrollment_id).await?;
    ctx.ensure_teaches_version(principal, current.course_version_id)
        .await?;

    let now = ctx.now();
    let enrollment = update_with_retry(ctx, enrollment_id, |enrollment| {
        enrollment.transition_to(EnrollmentStatus::Banned, now)?;
        enrollment.ban_reason = Some(reason.to_string());
        Ok(())
    })
    .await?;

    info!(
        "Enrollment {} banned by {}: {}",
        enrollment_id, principal.account_id, reason
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::EnrollmentBanned {
            enrollment_id,
            reason: reason.to_string(),
        },
    );
    Ok(enrollment)
}
