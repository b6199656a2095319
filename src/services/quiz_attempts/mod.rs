//! 测验作答状态机
//!
//! `(无) → IN_PROGRESS → {SUBMITTED, GRADED, EXPIRED, CANCELLED}`，`SUBMITTED → GRADED`。
//! 同一 (测验, 学生) 的开始作答串行执行，加锁顺序为先测验后选课。

pub mod answer;
pub mod finish;
pub mod present;
pub mod query;
pub mod start;
pub mod sweep;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::quizzes::{
    entities::{QuizAttempt, QuizAttemptAnswer},
    requests::{GradeAnswerRequest, SubmitAnswerRequest},
    responses::PresentedQuiz,
};

pub struct QuizAttemptService {
    ctx: Arc<EngineContext>,
}

impl QuizAttemptService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 开始作答
    pub async fn start(
        &self,
        principal: &Principal,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<QuizAttempt> {
        start::start(self, principal, quiz_id, student_id).await
    }

    // 按作答种子打乱后的试卷
    pub async fn present(&self, principal: &Principal, attempt_id: i64) -> Result<PresentedQuiz> {
        present::present(self, principal, attempt_id).await
    }

    // 提交单题答案（可覆盖）
    pub async fn submit_answer(
        &self,
        principal: &Principal,
        attempt_id: i64,
        question_id: i64,
        answer: SubmitAnswerRequest,
    ) -> Result<QuizAttemptAnswer> {
        answer::submit_answer(self, principal, attempt_id, question_id, answer).await
    }

    // 交卷
    pub async fn finish(&self, principal: &Principal, attempt_id: i64) -> Result<QuizAttempt> {
        finish::finish(self, principal, attempt_id).await
    }

    // 放弃作答
    pub async fn abandon(&self, principal: &Principal, attempt_id: i64) -> Result<QuizAttempt> {
        finish::abandon(self, principal, attempt_id).await
    }

    // 人工评分
    pub async fn grade_answer(
        &self,
        principal: &Principal,
        attempt_id: i64,
        question_id: i64,
        grade: GradeAnswerRequest,
    ) -> Result<QuizAttempt> {
        answer::grade_answer(self, principal, attempt_id, question_id, grade).await
    }

    // 剩余秒数，不限时返回空
    pub async fn remaining_seconds(
        &self,
        principal: &Principal,
        attempt_id: i64,
    ) -> Result<Option<i64>> {
        query::remaining_seconds(self, principal, attempt_id).await
    }

    // 已评分作答中的最高原始分
    pub async fn best_score(
        &self,
        principal: &Principal,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<f64>> {
        query::best_score(self, principal, quiz_id, student_id).await
    }

    pub async fn list_attempts(
        &self,
        principal: &Principal,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        query::list_attempts(self, principal, quiz_id, student_id).await
    }

    // 超时作答批量过期
    pub async fn sweep_timed_out(&self) -> Result<usize> {
        sweep::sweep_timed_out(self).await
    }
}
