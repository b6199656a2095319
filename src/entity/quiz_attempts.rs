//! 测验作答实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub attempt_number: i32,
    pub status: String,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub total_score: Option<f64>,
    pub shuffle_seed: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(has_many = "super::quiz_attempt_answers::Entity")]
    Answers,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::quiz_attempt_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attempt(self) -> crate::errors::Result<crate::models::quizzes::entities::QuizAttempt> {
        use chrono::{DateTime, Utc};

        Ok(crate::models::quizzes::entities::QuizAttempt {
            id: self.id,
            quiz_id: self.quiz_id,
            student_id: self.student_id,
            enrollment_id: self.enrollment_id,
            attempt_number: self.attempt_number,
            status: self.status.parse().map_err(LmsError::serialization)?,
            started_at: DateTime::<Utc>::from_timestamp(self.started_at, 0).unwrap_or_default(),
            finished_at: self
                .finished_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            total_score: self.total_score,
            // 种子按位存储为 i64
            shuffle_seed: self.shuffle_seed as u64,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
