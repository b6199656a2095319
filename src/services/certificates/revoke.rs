use tracing::info;

use super::CertificateService;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::certificates::entities::Certificate;
use crate::services::EngineContext;
use crate::utils::LockKey;

async fn load_certificate(ctx: &EngineContext, certificate_id: i64) -> Result<Certificate> {
    ctx.storage
        .get_certificate(certificate_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("certificate {certificate_id}")))
}

pub async fn revoke_certificate(
    service: &CertificateService,
    principal: &Principal,
    certificate_id: i64,
    reason: &str,
) -> Result<Certificate> {
    let ctx = service.ctx();
    let enrollment_id = load_certificate(ctx, certificate_id).await?.enrollment_id;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let mut certificate = load_certificate(ctx, certificate_id).await?;
    ctx.ensure_teaches_version(principal, certificate.course_version_id)
        .await?;
    certificate.revoke(reason, principal.account_id, ctx.now())?;
    let saved = ctx.storage.update_certificate(&certificate).await?;

    info!(
        "Certificate {} revoked by {}: {}",
        saved.code, principal.account_id, reason
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::CertificateRevoked {
            enrollment_id: saved.enrollment_id,
            certificate_id: saved.id,
            reason: reason.to_string(),
        },
    );
    Ok(saved)
}
