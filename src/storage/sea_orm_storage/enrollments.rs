//! 选课存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{LmsError, Result};
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::NewEnrollment,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建选课
    pub async fn create_enrollment_impl(&self, req: NewEnrollment) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        // 同一课程同时只能有一条学习中的选课
        let existing = Enrollments::find()
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::CourseId.eq(req.course_id))
            .filter(Column::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课失败: {e}")))?;
        if existing.is_some() {
            return Err(LmsError::already_enrolled(format!(
                "student {} already has an active enrollment in course {}",
                req.student_id, req.course_id
            )));
        }

        let enrolled_at = req.enrolled_at.timestamp();
        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            course_version_id: Set(req.course_version_id),
            status: Set(EnrollmentStatus::Enrolled.to_string()),
            enrolled_at: Set(enrolled_at),
            start_at: Set(enrolled_at),
            end_at: Set(req.end_at.map(|dt| dt.timestamp())),
            completion_percentage: Set(0.0),
            average_score: Set(None),
            final_exam_score: Set(None),
            final_exam_weight: Set(req.policy.final_weight),
            pass_score: Set(req.policy.pass_score),
            min_progress_pct: Set(req.policy.min_progress_pct),
            certificate_issued: Set(false),
            certificate_id: Set(None),
            completed_at: Set(None),
            cancellation_reason: Set(None),
            cancelled_at: Set(None),
            ban_reason: Set(None),
            banned_at: Set(None),
            payment_transaction_id: Set(req.payment_transaction_id),
            version: Set(1),
            created_at: Set(enrolled_at),
            updated_at: Set(enrolled_at),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, "创建选课"))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        result.into_enrollment()
    }

    /// 通过 ID 获取选课
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课失败: {e}")))?;

        result.map(|m| m.into_enrollment()).transpose()
    }

    /// 获取学习中的选课
    pub async fn find_enrolled_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课失败: {e}")))?;

        result.map(|m| m.into_enrollment()).transpose()
    }

    /// 获取某课程版本下最近的选课
    pub async fn find_latest_enrollment_for_version_impl(
        &self,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseVersionId.eq(course_version_id))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课失败: {e}")))?;

        result.map(|m| m.into_enrollment()).transpose()
    }

    /// 列出学生的选课
    pub async fn list_enrollments_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>> {
        let models = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_enrollment()).collect()
    }

    /// 列出课程下的选课
    pub async fn list_enrollments_by_course_impl(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        let models = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程选课失败: {e}")))?;

        models.into_iter().map(|m| m.into_enrollment()).collect()
    }

    /// 列出已过期但仍为学习中的选课
    pub async fn list_overdue_enrollments_impl(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Enrollment>> {
        let models = Enrollments::find()
            .filter(Column::Status.eq(EnrollmentStatus::Enrolled.as_str()))
            .filter(Column::EndAt.is_not_null())
            .filter(Column::EndAt.lt(now.timestamp()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询过期选课失败: {e}")))?;

        models.into_iter().map(|m| m.into_enrollment()).collect()
    }

    /// 乐观锁更新选课
    pub async fn update_enrollment_impl(&self, enrollment: &Enrollment) -> Result<Enrollment> {
        let next_version = enrollment.version + 1;
        let model = ActiveModel {
            status: Set(enrollment.status.to_string()),
            end_at: Set(enrollment.end_at.map(|dt| dt.timestamp())),
            completion_percentage: Set(enrollment.completion_percentage),
            average_score: Set(enrollment.average_score),
            final_exam_score: Set(enrollment.final_exam_score),
            certificate_issued: Set(enrollment.certificate_issued),
            certificate_id: Set(enrollment.certificate_id),
            completed_at: Set(enrollment.completed_at.map(|dt| dt.timestamp())),
            cancellation_reason: Set(enrollment.cancellation_reason.clone()),
            cancelled_at: Set(enrollment.cancelled_at.map(|dt| dt.timestamp())),
            ban_reason: Set(enrollment.ban_reason.clone()),
            banned_at: Set(enrollment.banned_at.map(|dt| dt.timestamp())),
            version: Set(next_version),
            updated_at: Set(enrollment.updated_at.timestamp()),
            ..Default::default()
        };

        let result = Enrollments::update_many()
            .set(model)
            .filter(Column::Id.eq(enrollment.id))
            .filter(Column::Version.eq(enrollment.version))
            .exec(&self.db)
            .await
            .map_err(|e| write_error(e, "更新选课"))?;

        if result.rows_affected == 0 {
            // 区分记录不存在与版本过期
            return match self.get_enrollment_by_id_impl(enrollment.id).await? {
                None => Err(LmsError::not_found(format!("enrollment {}", enrollment.id))),
                Some(current) => Err(LmsError::concurrency_conflict(format!(
                    "enrollment {} version {} is stale (current {})",
                    enrollment.id, enrollment.version, current.version
                ))),
            };
        }

        let mut updated = enrollment.clone();
        updated.version = next_version;
        Ok(updated)
    }
}
