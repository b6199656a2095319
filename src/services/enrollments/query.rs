use super::EnrollmentService;
use super::guard::load_locked;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::entities::Enrollment;
use crate::utils::LockKey;

pub async fn get_enrollment(
    service: &EnrollmentService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<Enrollment> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let enrollment = load_locked(ctx, enrollment_id).await?;
    principal.ensure_can_view(enrollment.student_id)?;
    Ok(enrollment)
}

pub async fn get_active_enrollment(
    service: &EnrollmentService,
    principal: &Principal,
    student_id: i64,
    course_id: i64,
) -> Result<Option<Enrollment>> {
    principal.ensure_can_view(student_id)?;
    let ctx = service.ctx();

    let Some(candidate) = ctx
        .storage
        .find_enrolled_enrollment(student_id, course_id)
        .await?
    else {
        return Ok(None);
    };

    let _guard = ctx.locks.lock(LockKey::Enrollment(candidate.id)).await;
    let enrollment = load_locked(ctx, candidate.id).await?;
    Ok(enrollment.is_active().then_some(enrollment))
}

pub async fn list_student_enrollments(
    service: &EnrollmentService,
    principal: &Principal,
    student_id: i64,
) -> Result<Vec<Enrollment>> {
    principal.ensure_can_view(student_id)?;
    let ctx = service.ctx();
    let now = ctx.now();

    let mut enrollments = ctx.storage.list_enrollments_by_student(student_id).await?;
    for enrollment in enrollments.iter_mut() {
        if enrollment.is_due_for_expiry(now) {
            let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment.id)).await;
            *enrollment = load_locked(ctx, enrollment.id).await?;
        }
    }
    Ok(enrollments)
}
