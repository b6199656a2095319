//! 作业提交
//!
//! 每次提交是一条独立记录，重交时链接到上一条。
//! 待批改的提交可以原地修改，批改或退回后只能重交。

pub mod query;
pub mod review;
pub mod submit;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::assignments::{entities::Submission, requests::GradeSubmissionRequest};

pub struct SubmissionService {
    ctx: Arc<EngineContext>,
}

impl SubmissionService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 首次提交，或修改待批改的提交
    pub async fn submit(
        &self,
        principal: &Principal,
        assignment_id: i64,
        student_id: i64,
        content: String,
    ) -> Result<Submission> {
        submit::submit(self, principal, assignment_id, student_id, content).await
    }

    // 重新提交
    pub async fn resubmit(
        &self,
        principal: &Principal,
        assignment_id: i64,
        student_id: i64,
        content: String,
    ) -> Result<Submission> {
        submit::resubmit(self, principal, assignment_id, student_id, content).await
    }

    // 批改（可重复批改）
    pub async fn grade(
        &self,
        principal: &Principal,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Submission> {
        review::grade(self, principal, submission_id, grade).await
    }

    // 退回
    pub async fn reject(
        &self,
        principal: &Principal,
        submission_id: i64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        review::reject(self, principal, submission_id, feedback).await
    }

    pub async fn best_submission(
        &self,
        principal: &Principal,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        query::best_submission(self, principal, assignment_id, student_id).await
    }

    pub async fn list_submissions(
        &self,
        principal: &Principal,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        query::list_submissions(self, principal, assignment_id, student_id).await
    }

    // 同一分数批改多份提交
    pub async fn bulk_grade(
        &self,
        principal: &Principal,
        submission_ids: &[i64],
        grade: GradeSubmissionRequest,
    ) -> Result<Vec<Submission>> {
        review::bulk_grade(self, principal, submission_ids, grade).await
    }

    // 作业及格率（百分比）
    pub async fn passing_rate(&self, principal: &Principal, assignment_id: i64) -> Result<Option<f64>> {
        query::passing_rate(self, principal, assignment_id).await
    }
}
