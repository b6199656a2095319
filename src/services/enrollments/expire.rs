use tracing::{error, info};

use super::EnrollmentService;
use super::guard::load_locked;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::services::EngineContext;
use crate::utils::{LockKey, retry_on_conflict};

/// 已到期则迁移到 EXPIRED，调用方需持有选课锁
pub(crate) async fn expire_locked(
    ctx: &EngineContext,
    enrollment_id: i64,
    actor_id: Option<i64>,
) -> Result<Enrollment> {
    let now = ctx.now();
    let (enrollment, expired) =
        retry_on_conflict(ctx.policy.max_conflict_retries, move || async move {
            let mut enrollment = ctx
                .storage
                .get_enrollment_by_id(enrollment_id)
                .await?
                .ok_or_else(|| LmsError::not_found(format!("enrollment {enrollment_id}")))?;
            if !enrollment.is_due_for_expiry(now) {
                return Ok((enrollment, false));
            }
            enrollment.transition_to(EnrollmentStatus::Expired, now)?;
            let saved = ctx.storage.update_enrollment(&enrollment).await?;
            Ok((saved, true))
        })
        .await?;

    if expired {
        info!(
            "Enrollment {} expired at {} (completion {}%)",
            enrollment.id, now, enrollment.completion_percentage
        );
        ctx.publish(actor_id, DomainEvent::EnrollmentExpired { enrollment_id });
    }
    Ok(enrollment)
}

pub async fn expire(service: &EnrollmentService, enrollment_id: i64) -> Result<Enrollment> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;
    load_locked(ctx, enrollment_id).await
}

pub async fn sweep_expired(service: &EnrollmentService) -> Result<usize> {
    let ctx = service.ctx();
    let overdue = ctx.storage.list_overdue_enrollments(ctx.now()).await?;

    let mut expired = 0;
    for candidate in overdue {
        let _guard = ctx.locks.lock(LockKey::Enrollment(candidate.id)).await;
        match expire_locked(ctx, candidate.id, None).await {
            Ok(enrollment) if enrollment.status == EnrollmentStatus::Expired => expired += 1,
            Ok(_) => {}
            Err(e) => error!("Failed to expire enrollment {}: {}", candidate.id, e),
        }
    }

    if expired > 0 {
        info!("Expiry sweep finished: {} enrollment(s) expired", expired);
    }
    Ok(expired)
}
