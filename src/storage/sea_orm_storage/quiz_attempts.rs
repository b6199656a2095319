//! 测验作答存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::quiz_attempt_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as QuizAttemptAnswers,
};
use crate::entity::quiz_attempts::{ActiveModel, Column, Entity as QuizAttempts};
use crate::errors::{LmsError, Result};
use crate::models::quizzes::{
    entities::{QuizAttempt, QuizAttemptAnswer, QuizAttemptStatus},
    requests::NewQuizAttempt,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建作答
    pub async fn create_quiz_attempt_impl(&self, req: NewQuizAttempt) -> Result<QuizAttempt> {
        let started_at = req.started_at.timestamp();
        let model = ActiveModel {
            quiz_id: Set(req.quiz_id),
            student_id: Set(req.student_id),
            enrollment_id: Set(req.enrollment_id),
            attempt_number: Set(req.attempt_number),
            status: Set(QuizAttemptStatus::InProgress.to_string()),
            started_at: Set(started_at),
            finished_at: Set(None),
            total_score: Set(None),
            // 按位存储
            shuffle_seed: Set(req.shuffle_seed as i64),
            updated_at: Set(started_at),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "创建测验作答"))?;

        result.into_attempt()
    }

    /// 通过 ID 获取作答
    pub async fn get_quiz_attempt_impl(&self, id: i64) -> Result<Option<QuizAttempt>> {
        let result = QuizAttempts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答失败: {e}")))?;

        result.map(|m| m.into_attempt()).transpose()
    }

    /// 列出学生某测验的作答
    pub async fn list_quiz_attempts_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let models = QuizAttempts::find()
            .filter(Column::QuizId.eq(quiz_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_attempt()).collect()
    }

    /// 列出选课下的作答
    pub async fn list_quiz_attempts_by_enrollment_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let models = QuizAttempts::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(Column::QuizId)
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_attempt()).collect()
    }

    /// 列出作答中的记录
    pub async fn list_in_progress_attempts_impl(&self) -> Result<Vec<QuizAttempt>> {
        let models = QuizAttempts::find()
            .filter(Column::Status.eq(QuizAttemptStatus::InProgress.as_str()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答中记录失败: {e}")))?;

        models.into_iter().map(|m| m.into_attempt()).collect()
    }

    /// 更新作答
    pub async fn update_quiz_attempt_impl(&self, attempt: &QuizAttempt) -> Result<QuizAttempt> {
        let model = ActiveModel {
            id: Set(attempt.id),
            status: Set(attempt.status.to_string()),
            finished_at: Set(attempt.finished_at.map(|dt| dt.timestamp())),
            total_score: Set(attempt.total_score),
            updated_at: Set(attempt.updated_at.timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "更新测验作答"))?;

        result.into_attempt()
    }

    /// 新增或覆盖单题答案
    pub async fn upsert_attempt_answer_impl(
        &self,
        answer: &QuizAttemptAnswer,
    ) -> Result<QuizAttemptAnswer> {
        let existing = QuizAttemptAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(answer.attempt_id))
            .filter(AnswerColumn::QuestionId.eq(answer.question_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询答案失败: {e}")))?;

        let selected = if answer.selected_option_ids.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&answer.selected_option_ids)?)
        };

        let mut model = AnswerActiveModel {
            attempt_id: Set(answer.attempt_id),
            question_id: Set(answer.question_id),
            selected_option_ids: Set(selected),
            text_answer: Set(answer.text_answer.clone()),
            score: Set(answer.score),
            is_graded: Set(answer.is_graded),
            graded_by: Set(answer.graded_by),
            feedback: Set(answer.feedback.clone()),
            answered_at: Set(answer.answered_at.timestamp()),
            ..Default::default()
        };

        let result = match existing {
            Some(row) => {
                model.id = Set(row.id);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| write_error(e, "更新答案"))?
            }
            None => model
                .insert(&self.db)
                .await
                .map_err(|e| write_error(e, "保存答案"))?,
        };

        result.into_answer()
    }

    /// 列出作答的全部答案
    pub async fn list_attempt_answers_impl(
        &self,
        attempt_id: i64,
    ) -> Result<Vec<QuizAttemptAnswer>> {
        let models = QuizAttemptAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .order_by_asc(AnswerColumn::QuestionId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询答案列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_answer()).collect()
    }
}
