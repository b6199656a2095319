//! 测验题目实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub points: f64,
    pub order_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
    #[sea_orm(has_many = "super::answer_options::Entity")]
    Options,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::answer_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(
        self,
        options: Vec<crate::models::quizzes::entities::AnswerOption>,
    ) -> crate::errors::Result<crate::models::quizzes::entities::QuizQuestion> {
        Ok(crate::models::quizzes::entities::QuizQuestion {
            id: self.id,
            quiz_id: self.quiz_id,
            question_type: self.question_type.parse().map_err(LmsError::serialization)?,
            content: self.content,
            points: self.points,
            order_index: self.order_index,
            options,
        })
    }
}
