//! 学习进度存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::progress::{ActiveModel, Column, Entity as ProgressRecords};
use crate::errors::{LmsError, Result};
use crate::models::progress::entities::Progress;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn to_active_model(progress: &Progress) -> ActiveModel {
    ActiveModel {
        enrollment_id: Set(progress.enrollment_id),
        student_id: Set(progress.student_id),
        lesson_id: Set(progress.lesson_id),
        status: Set(progress.status.to_string()),
        viewed_at: Set(progress.viewed_at.map(|dt| dt.timestamp())),
        times_viewed: Set(progress.times_viewed),
        watched_duration_seconds: Set(progress.watched_duration_seconds),
        watched_percentage: Set(progress.watched_percentage),
        completed_at: Set(progress.completed_at.map(|dt| dt.timestamp())),
        is_bookmarked: Set(progress.is_bookmarked),
        notes: Set(progress.notes.clone()),
        updated_at: Set(progress.updated_at.timestamp()),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 获取课时进度
    pub async fn get_progress_impl(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> Result<Option<Progress>> {
        let result = ProgressRecords::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .filter(Column::LessonId.eq(lesson_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学习进度失败: {e}")))?;

        result.map(|m| m.into_progress()).transpose()
    }

    /// 创建进度，(enrollment, lesson) 冲突时返回并发冲突
    pub async fn create_progress_impl(&self, progress: &Progress) -> Result<Progress> {
        let result = to_active_model(progress)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "创建学习进度"))?;

        result.into_progress()
    }

    /// 更新进度
    pub async fn update_progress_impl(&self, progress: &Progress) -> Result<Progress> {
        let mut model = to_active_model(progress);
        model.id = Set(progress.id);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "更新学习进度"))?;

        result.into_progress()
    }

    /// 列出选课下的全部进度
    pub async fn list_progress_by_enrollment_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<Progress>> {
        let models = ProgressRecords::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(Column::LessonId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学习进度列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_progress()).collect()
    }
}
