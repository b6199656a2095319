//! 证书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub enrollment_id: i64,
    pub student_id: i64,
    pub course_version_id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub final_score: f64,
    pub issued_at: i64,
    pub revoked: bool,
    pub revoked_at: Option<i64>,
    pub revoked_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub revoke_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_certificate(self) -> crate::models::certificates::entities::Certificate {
        use chrono::{DateTime, Utc};

        crate::models::certificates::entities::Certificate {
            id: self.id,
            enrollment_id: self.enrollment_id,
            student_id: self.student_id,
            course_version_id: self.course_version_id,
            code: self.code,
            final_score: self.final_score,
            issued_at: DateTime::<Utc>::from_timestamp(self.issued_at, 0).unwrap_or_default(),
            revoked: self.revoked,
            revoked_at: self
                .revoked_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            revoked_by: self.revoked_by,
            revoke_reason: self.revoke_reason,
        }
    }
}
