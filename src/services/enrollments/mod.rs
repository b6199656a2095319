//! 选课生命周期
//!
//! `ENROLLED → {COMPLETED, CANCELLED, EXPIRED, BANNED}`，后四者为终态。
//! 同一选课的所有写操作在 `LockKey::Enrollment` 下串行执行。

pub mod enroll;
pub mod expire;
pub(crate) mod guard;
pub mod query;
pub(crate) mod recompute;
pub mod stats;
pub mod terminate;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::{entities::Enrollment, responses::EnrollmentStats};

pub struct EnrollmentService {
    ctx: Arc<EngineContext>,
}

impl EnrollmentService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 选课
    pub async fn enroll(
        &self,
        principal: &Principal,
        student_id: i64,
        course_version_id: i64,
        payment_transaction_id: Option<i64>,
    ) -> Result<Enrollment> {
        enroll::enroll(
            self,
            principal,
            student_id,
            course_version_id,
            payment_transaction_id,
        )
        .await
    }

    // 学生主动退课
    pub async fn cancel(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        reason: &str,
    ) -> Result<Enrollment> {
        terminate::cancel(self, principal, enrollment_id, reason).await
    }

    // 教师/管理员封禁
    pub async fn ban(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        reason: &str,
    ) -> Result<Enrollment> {
        terminate::ban(self, principal, enrollment_id, reason).await
    }

    // 获取选课（读取时检查是否过期）
    pub async fn get_enrollment(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<Enrollment> {
        query::get_enrollment(self, principal, enrollment_id).await
    }

    // 学生在某课程下学习中的选课
    pub async fn get_active_enrollment(
        &self,
        principal: &Principal,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        query::get_active_enrollment(self, principal, student_id, course_id).await
    }

    pub async fn list_student_enrollments(
        &self,
        principal: &Principal,
        student_id: i64,
    ) -> Result<Vec<Enrollment>> {
        query::list_student_enrollments(self, principal, student_id).await
    }

    // 单个选课的过期检查
    pub async fn expire(&self, enrollment_id: i64) -> Result<Enrollment> {
        expire::expire(self, enrollment_id).await
    }

    // 批量过期，返回本次过期的数量
    pub async fn sweep_expired(&self) -> Result<usize> {
        expire::sweep_expired(self).await
    }

    // 课程维度的选课统计（授课教师或管理员）
    pub async fn enrollment_stats(
        &self,
        principal: &Principal,
        course_id: i64,
    ) -> Result<EnrollmentStats> {
        stats::enrollment_stats(self, principal, course_id).await
    }

    // 重新计算完成度与成绩
    pub async fn recompute_completion(&self, enrollment_id: i64) -> Result<Enrollment> {
        let ctx = self.ctx();
        let _guard = ctx
            .locks
            .lock(crate::utils::LockKey::Enrollment(enrollment_id))
            .await;
        recompute::recompute_locked(ctx, enrollment_id, None).await
    }
}
