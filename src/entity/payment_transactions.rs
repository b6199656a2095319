//! 支付流水实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_version_id: i64,
    pub amount: f64,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::errors::Result<crate::models::payments::entities::PaymentTransaction> {
        use chrono::{DateTime, Utc};

        Ok(crate::models::payments::entities::PaymentTransaction {
            id: self.id,
            student_id: self.student_id,
            course_version_id: self.course_version_id,
            amount: self.amount,
            status: self.status.parse().map_err(LmsError::serialization)?,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}
