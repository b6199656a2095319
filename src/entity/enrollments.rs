//! 选课实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub course_version_id: i64,
    pub status: String,
    pub enrolled_at: i64,
    pub start_at: i64,
    pub end_at: Option<i64>,
    pub completion_percentage: f64,
    pub average_score: Option<f64>,
    pub final_exam_score: Option<f64>,
    pub final_exam_weight: f64,
    pub pass_score: f64,
    pub min_progress_pct: f64,
    pub certificate_issued: bool,
    pub certificate_id: Option<i64>,
    pub completed_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ban_reason: Option<String>,
    pub banned_at: Option<i64>,
    pub payment_transaction_id: Option<i64>,
    pub version: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_versions::Entity",
        from = "Column::CourseVersionId",
        to = "super::course_versions::Column::Id"
    )]
    CourseVersion,
    #[sea_orm(has_many = "super::progress::Entity")]
    Progress,
    #[sea_orm(has_many = "super::quiz_attempts::Entity")]
    QuizAttempts,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::course_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseVersion.def()
    }
}

impl Related<super::progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizAttempts.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::errors::Result<crate::models::enrollments::entities::Enrollment> {
        use crate::models::enrollments::entities::Enrollment;
        use chrono::{DateTime, Utc};

        let ts = |v: i64| DateTime::<Utc>::from_timestamp(v, 0).unwrap_or_default();
        let opt_ts = |v: Option<i64>| v.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0));

        Ok(Enrollment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            course_version_id: self.course_version_id,
            status: self.status.parse().map_err(LmsError::serialization)?,
            enrolled_at: ts(self.enrolled_at),
            start_at: ts(self.start_at),
            end_at: opt_ts(self.end_at),
            completion_percentage: self.completion_percentage,
            average_score: self.average_score,
            final_exam_score: self.final_exam_score,
            final_exam_weight: self.final_exam_weight,
            pass_score: self.pass_score,
            min_progress_pct: self.min_progress_pct,
            certificate_issued: self.certificate_issued,
            certificate_id: self.certificate_id,
            completed_at: opt_ts(self.completed_at),
            cancellation_reason: self.cancellation_reason,
            cancelled_at: opt_ts(self.cancelled_at),
            ban_reason: self.ban_reason,
            banned_at: opt_ts(self.banned_at),
            payment_transaction_id: self.payment_transaction_id,
            version: self.version,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        })
    }
}
