use super::GradingService;
use super::calc::{self, GradingInputs};
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::{
    entities::Enrollment,
    responses::{FinalExamEligibility, GradeSummary},
};
use crate::services::EngineContext;
use crate::services::enrollments::recompute::recompute_locked;
use crate::services::progress::summary::{course_progress_for, load_viewable};
use crate::utils::LockKey;

/// 从子记录实时计算成绩汇总
pub(crate) async fn build_summary(
    ctx: &EngineContext,
    enrollment: &Enrollment,
) -> Result<GradeSummary> {
    let progress = course_progress_for(ctx, enrollment).await?;
    let quizzes = ctx
        .storage
        .list_quizzes_by_course_version(enrollment.course_version_id)
        .await?;
    let attempts = ctx
        .storage
        .list_quiz_attempts_by_enrollment(enrollment.id)
        .await?;
    let assignments = ctx
        .storage
        .list_assignments_by_course_version(enrollment.course_version_id)
        .await?;
    let submissions = ctx
        .storage
        .list_submissions_by_enrollment(enrollment.id)
        .await?;

    let inputs = GradingInputs {
        quizzes: &quizzes,
        attempts: &attempts,
        assignments: &assignments,
        submissions: &submissions,
    };
    Ok(calc::summarize(
        enrollment,
        progress.completion_percentage,
        &inputs,
        ctx.policy.score_aggregation,
    ))
}

/// 当前进度是否满足期末考试要求
pub(crate) async fn eligibility_for(
    ctx: &EngineContext,
    enrollment: &Enrollment,
) -> Result<FinalExamEligibility> {
    let progress = course_progress_for(ctx, enrollment).await?;
    Ok(calc::eligibility(
        progress.completion_percentage,
        enrollment.min_progress_pct,
    ))
}

pub async fn grade_summary(
    service: &GradingService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<GradeSummary> {
    let ctx = service.ctx();
    let enrollment = load_viewable(ctx, principal, enrollment_id).await?;
    build_summary(ctx, &enrollment).await
}

pub async fn check_final_exam_eligibility(
    service: &GradingService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<FinalExamEligibility> {
    let ctx = service.ctx();
    let enrollment = load_viewable(ctx, principal, enrollment_id).await?;
    eligibility_for(ctx, &enrollment).await
}

pub async fn recompute(service: &GradingService, enrollment_id: i64) -> Result<Enrollment> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;
    recompute_locked(ctx, enrollment_id, None).await
}
