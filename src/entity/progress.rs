//! 学习进度实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub lesson_id: i64,
    pub status: String,
    pub viewed_at: Option<i64>,
    pub times_viewed: i32,
    pub watched_duration_seconds: i64,
    pub watched_percentage: f64,
    pub completed_at: Option<i64>,
    pub is_bookmarked: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id"
    )]
    Lesson,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_progress(self) -> crate::errors::Result<crate::models::progress::entities::Progress> {
        use chrono::{DateTime, Utc};

        Ok(crate::models::progress::entities::Progress {
            id: self.id,
            enrollment_id: self.enrollment_id,
            student_id: self.student_id,
            lesson_id: self.lesson_id,
            status: self.status.parse().map_err(LmsError::serialization)?,
            viewed_at: self
                .viewed_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            times_viewed: self.times_viewed,
            watched_duration_seconds: self.watched_duration_seconds,
            watched_percentage: self.watched_percentage,
            completed_at: self
                .completed_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            is_bookmarked: self.is_bookmarked,
            notes: self.notes,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
