use super::CertificateService;
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::certificates::{
    entities::Certificate, responses::CertificateVerification,
};

pub async fn verify_certificate(
    service: &CertificateService,
    code: &str,
) -> Result<CertificateVerification> {
    let code = code.trim();
    if code.is_empty() {
        return Err(LmsError::validation("certificate code must not be empty"));
    }
    let certificate = service
        .ctx()
        .storage
        .get_certificate_by_code(code)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("certificate {code}")))?;
    Ok(certificate.into())
}

pub async fn get_enrollment_certificate(
    service: &CertificateService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<Option<Certificate>> {
    let ctx = service.ctx();
    let enrollment = ctx
        .storage
        .get_enrollment_by_id(enrollment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("enrollment {enrollment_id}")))?;
    principal.ensure_can_view(enrollment.student_id)?;
    ctx.storage.get_certificate_by_enrollment(enrollment_id).await
}
