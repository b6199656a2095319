//! 派生字段重算
//!
//! completion_percentage / average_score / final_exam_score 是子记录的物化结果，
//! 只在这里写入。

use tracing::{debug, info, warn};

use super::guard::load_locked;
use crate::errors::Result;
use crate::events::DomainEvent;
use crate::models::certificates::entities::Certificate;
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::services::EngineContext;
use crate::services::grading::summary::build_summary;
use crate::utils::retry_on_conflict;

/// 重算并在满足条件时完成选课，调用方需持有选课锁
pub(crate) async fn recompute_locked(
    ctx: &EngineContext,
    enrollment_id: i64,
    actor_id: Option<i64>,
) -> Result<Enrollment> {
    let now = ctx.now();
    let (enrollment, completed) =
        retry_on_conflict(ctx.policy.max_conflict_retries, move || async move {
            let mut enrollment = load_locked(ctx, enrollment_id).await?;
            let summary = build_summary(ctx, &enrollment).await?;

            let should_complete = enrollment.is_active() && summary.is_passing;
            // 完成时总分必须落库，即使还没有任何已评分项目
            let average_score =
                (summary.graded_items > 0 || should_complete).then_some(summary.final_score);
            let unchanged = enrollment.completion_percentage == summary.completion_percentage
                && enrollment.average_score == average_score
                && enrollment.final_exam_score == summary.final_exam_score;

            debug!(
                "Recompute enrollment {}: completion {}%, final score {}, passing {}",
                enrollment_id, summary.completion_percentage, summary.final_score, summary.is_passing
            );

            if unchanged && !should_complete {
                return Ok((enrollment, false));
            }

            enrollment.completion_percentage = summary.completion_percentage;
            enrollment.average_score = average_score;
            enrollment.final_exam_score = summary.final_exam_score;
            enrollment.updated_at = now;
            if should_complete {
                enrollment.transition_to(EnrollmentStatus::Completed, now)?;
            }

            let saved = ctx.storage.update_enrollment(&enrollment).await?;
            Ok((saved, should_complete))
        })
        .await?;

    if !completed {
        return Ok(enrollment);
    }

    info!(
        "Enrollment {} completed with final score {:?}",
        enrollment.id, enrollment.average_score
    );
    ctx.publish(
        actor_id,
        DomainEvent::EnrollmentCompleted {
            enrollment_id: enrollment.id,
            final_score: enrollment.average_score.unwrap_or(0.0),
        },
    );

    Ok(issue_certificate(ctx, enrollment, actor_id).await)
}

/// 签发失败只记录日志，不影响完成状态
async fn issue_certificate(
    ctx: &EngineContext,
    enrollment: Enrollment,
    actor_id: Option<i64>,
) -> Enrollment {
    match record_certificate(ctx, &enrollment, actor_id).await {
        Ok((saved, _)) => saved,
        Err(e) => {
            warn!(
                "Certificate issuance failed for enrollment {}: {}",
                enrollment.id, e
            );
            enrollment
        }
    }
}

/// 签发证书并回写选课，调用方需持有选课锁
pub(crate) async fn record_certificate(
    ctx: &EngineContext,
    enrollment: &Enrollment,
    actor_id: Option<i64>,
) -> Result<(Enrollment, Certificate)> {
    let now = ctx.now();
    let certificate = ctx.certificates.issue(enrollment, now).await?;

    let mut updated = enrollment.clone();
    updated.certificate_issued = true;
    updated.certificate_id = Some(certificate.id);
    updated.updated_at = now;
    let saved = ctx.storage.update_enrollment(&updated).await?;

    ctx.publish(
        actor_id,
        DomainEvent::CertificateIssued {
            enrollment_id: saved.id,
            certificate_id: certificate.id,
            code: certificate.code.clone(),
        },
    );
    Ok((saved, certificate))
}
