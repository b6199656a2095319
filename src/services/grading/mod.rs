//! 成绩聚合
//!
//! 选课的 average_score / final_exam_score 只由这里计算，写入由选课重算完成。

pub mod calc;
pub mod summary;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::{
    entities::Enrollment,
    responses::{FinalExamEligibility, GradeSummary},
};

pub struct GradingService {
    ctx: Arc<EngineContext>,
}

impl GradingService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 平时成绩平均分（0–10），无已评分项目时为空
    pub async fn compute_average_score(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<Option<f64>> {
        Ok(summary::grade_summary(self, principal, enrollment_id)
            .await?
            .coursework_average)
    }

    // 期末考试资格
    pub async fn check_final_exam_eligibility(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<FinalExamEligibility> {
        summary::check_final_exam_eligibility(self, principal, enrollment_id).await
    }

    // 加权总评
    pub async fn compute_final_score(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<f64> {
        Ok(summary::grade_summary(self, principal, enrollment_id)
            .await?
            .final_score)
    }

    pub async fn is_passing(&self, principal: &Principal, enrollment_id: i64) -> Result<bool> {
        Ok(summary::grade_summary(self, principal, enrollment_id)
            .await?
            .is_passing)
    }

    pub async fn grade_summary(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<GradeSummary> {
        summary::grade_summary(self, principal, enrollment_id).await
    }

    // 重新计算并写回选课
    pub async fn recompute(&self, enrollment_id: i64) -> Result<Enrollment> {
        summary::recompute(self, enrollment_id).await
    }
}
