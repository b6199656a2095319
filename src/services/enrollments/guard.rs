//! 选课读写的公共检查，调用方需已持有该选课的锁

use crate::errors::{LmsError, Result};
use crate::models::enrollments::entities::Enrollment;
use crate::services::EngineContext;
use crate::utils::retry_on_conflict;

use super::expire::expire_locked;

/// 读取选课并执行惰性过期
pub(crate) async fn load_locked(ctx: &EngineContext, enrollment_id: i64) -> Result<Enrollment> {
    let enrollment = ctx
        .storage
        .get_enrollment_by_id(enrollment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("enrollment {enrollment_id}")))?;

    if enrollment.is_due_for_expiry(ctx.now()) {
        return expire_locked(ctx, enrollment_id, None).await;
    }
    Ok(enrollment)
}

/// 子记录写入要求选课处于学习中
pub(crate) fn require_active(enrollment: &Enrollment) -> Result<()> {
    enrollment.ensure_writable()
}

/// 读-改-写，版本冲突时整体重试
pub(crate) async fn update_with_retry<F>(
    ctx: &EngineContext,
    enrollment_id: i64,
    mutate: F,
) -> Result<Enrollment>
where
    F: Fn(&mut Enrollment) -> Result<()>,
{
    let mutate = &mutate;
    retry_on_conflict(ctx.policy.max_conflict_retries, move || async move {
        let mut enrollment = load_locked(ctx, enrollment_id).await?;
        mutate(&mut enrollment)?;
        ctx.storage.update_enrollment(&enrollment).await
    })
    .await
}
