use tracing::info;

use super::CertificateService;
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::certificates::entities::Certificate;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::services::enrollments::guard::load_locked;
use crate::services::enrollments::recompute::record_certificate;
use crate::utils::LockKey;

pub async fn issue_certificate(
    service: &CertificateService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<Certificate> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let enrollment = load_locked(ctx, enrollment_id).await?;
    // 学生本人，或该课程的教师
    if principal.ensure_owner(enrollment.student_id).is_err() {
        ctx.ensure_teaches_version(principal, enrollment.course_version_id)
            .await?;
    }

    if enrollment.status != EnrollmentStatus::Completed {
        return Err(LmsError::invalid_transition(format!(
            "enrollment {enrollment_id} is {}, certificates require completion",
            enrollment.status
        )));
    }
    if enrollment.certificate_issued {
        return Err(LmsError::invalid_transition(format!(
            "certificate for enrollment {enrollment_id} was already issued"
        )));
    }

    let (_, certificate) =
        record_certificate(ctx, &enrollment, Some(principal.account_id)).await?;
    info!(
        "Certificate {} reissued for enrollment {} by {}",
        certificate.code, enrollment_id, principal.account_id
    );
    Ok(certificate)
}
