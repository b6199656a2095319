//! 课程版本实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub version_number: i32,
    pub title: String,
    pub price: f64,
    pub duration_days: i32,
    pub pass_score: f64,
    pub final_weight: f64,
    pub min_progress_pct: f64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chapters::Entity")]
    Chapters,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::chapters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chapters.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_version(self) -> crate::errors::Result<crate::models::courses::entities::CourseVersion> {
        use crate::models::courses::entities::CourseVersion;
        use chrono::{DateTime, Utc};

        Ok(CourseVersion {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            version_number: self.version_number,
            title: self.title,
            price: self.price,
            duration_days: self.duration_days,
            pass_score: self.pass_score,
            final_weight: self.final_weight,
            min_progress_pct: self.min_progress_pct,
            status: self.status.parse().map_err(LmsError::serialization)?,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
