//! 单题作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_attempt_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    /// JSON 数组形式的选项 ID
    #[sea_orm(column_type = "Text", nullable)]
    pub selected_option_ids: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    pub score: Option<f64>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub answered_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::quiz_attempts::Column::Id"
    )]
    Attempt,
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::errors::Result<crate::models::quizzes::entities::QuizAttemptAnswer> {
        use chrono::{DateTime, Utc};

        let selected_option_ids = match self.selected_option_ids.as_deref() {
            Some(raw) if !raw.is_empty() => serde_json::from_str(raw)?,
            _ => Vec::new(),
        };

        Ok(crate::models::quizzes::entities::QuizAttemptAnswer {
            id: self.id,
            attempt_id: self.attempt_id,
            question_id: self.question_id,
            selected_option_ids,
            text_answer: self.text_answer,
            score: self.score,
            is_graded: self.is_graded,
            graded_by: self.graded_by,
            feedback: self.feedback,
            answered_at: DateTime::<Utc>::from_timestamp(self.answered_at, 0).unwrap_or_default(),
        })
    }
}
