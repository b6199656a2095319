use chrono::Duration;
use tracing::info;

use super::EnrollmentService;
use super::expire::expire_locked;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::enrollments::{entities::Enrollment, requests::NewEnrollment};
use crate::utils::LockKey;

pub async fn enroll(
    service: &EnrollmentService,
    principal: &Principal,
    student_id: i64,
    course_version_id: i64,
    payment_transaction_id: Option<i64>,
) -> Result<Enrollment> {
    principal.ensure_owner(student_id)?;
    let ctx = service.ctx();

    let course_version = ctx
        .storage
        .get_course_version(course_version_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("course version {course_version_id}")))?;
    if !course_version.is_published() {
        return Err(LmsError::validation(format!(
            "course version {course_version_id} is {}, only published versions accept enrollments",
            course_version.status
        )));
    }

    let _guard = ctx
        .locks
        .lock(LockKey::StudentCourse {
            student_id,
            course_id: course_version.course_id,
        })
        .await;

    if let Some(existing) = ctx
        .storage
        .find_enrolled_enrollment(student_id, course_version.course_id)
        .await?
    {
        // 到期的旧选课先过期，再允许重新选课
        let _existing_guard = ctx.locks.lock(LockKey::Enrollment(existing.id)).await;
        let existing = expire_locked(ctx, existing.id, Some(principal.account_id)).await?;
        if existing.is_active() {
            return Err(LmsError::already_enrolled(format!(
                "student {student_id} is already enrolled in course {} (enrollment {})",
                course_version.course_id, existing.id
            )));
        }
    }

    // 管理员可为学生手动选课，无需支付
    if !course_version.is_free() && !principal.is_admin() {
        let transaction_id = payment_transaction_id.ok_or_else(|| {
            LmsError::payment_required(format!(
                "course version {course_version_id} costs {}",
                course_version.price
            ))
        })?;
        ctx.payments
            .verify(transaction_id, student_id, course_version_id)
            .await?;
    }

    let now = ctx.now();
    let end_at = (course_version.duration_days > 0)
        .then(|| now + Duration::days(i64::from(course_version.duration_days)));

    let enrollment = ctx
        .storage
        .create_enrollment(NewEnrollment {
            student_id,
            course_id: course_version.course_id,
            course_version_id,
            policy: course_version.grading_policy(),
            payment_transaction_id,
            enrolled_at: now,
            end_at,
        })
        .await?;

    info!(
        "Student {} enrolled in course version {} (enrollment {})",
        student_id, course_version_id, enrollment.id
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::Enrolled {
            enrollment_id: enrollment.id,
            student_id,
            course_version_id,
        },
    );

    Ok(enrollment)
}
