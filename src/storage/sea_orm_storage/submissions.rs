//! 作业提交存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::{Submission, SubmissionStatus},
    requests::NewSubmission,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let submitted_at = req.submitted_at.timestamp();
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            enrollment_id: Set(req.enrollment_id),
            attempt_number: Set(req.attempt_number),
            previous_submission_id: Set(req.previous_submission_id),
            content: Set(req.content),
            status: Set(SubmissionStatus::Pending.to_string()),
            score: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            graded_at: Set(None),
            submitted_at: Set(submitted_at),
            updated_at: Set(submitted_at),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "创建作业提交"))?;

        result.into_submission()
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 列出学生某作业的提交
    pub async fn list_submissions_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let models = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业提交列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_submission()).collect()
    }

    /// 列出作业的全部提交
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let models = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业提交列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_submission()).collect()
    }

    /// 列出选课下的提交
    pub async fn list_submissions_by_enrollment_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<Submission>> {
        let models = Submissions::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(Column::AssignmentId)
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业提交列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_submission()).collect()
    }

    /// 更新提交
    pub async fn update_submission_impl(&self, submission: &Submission) -> Result<Submission> {
        let model = ActiveModel {
            id: Set(submission.id),
            content: Set(submission.content.clone()),
            status: Set(submission.status.to_string()),
            score: Set(submission.score),
            feedback: Set(submission.feedback.clone()),
            graded_by: Set(submission.graded_by),
            graded_at: Set(submission.graded_at.map(|dt| dt.timestamp())),
            submitted_at: Set(submission.submitted_at.timestamp()),
            updated_at: Set(submission.updated_at.timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "更新作业提交"))?;

        result.into_submission()
    }
}
