//! 测验实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_version_id: i64,
    pub lesson_id: Option<i64>,
    pub title: String,
    pub max_attempts: Option<i32>,
    pub time_limit_minutes: Option<i32>,
    pub passing_score: Option<f64>,
    pub randomize_questions: bool,
    pub randomize_options: bool,
    pub total_points: f64,
    pub is_final_exam: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::quiz_attempts::Entity")]
    Attempts,
}

impl Related<super::quiz_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装测验（题目由调用方按顺序传入）
    pub fn into_quiz(
        self,
        questions: Vec<crate::models::quizzes::entities::QuizQuestion>,
    ) -> crate::models::quizzes::entities::Quiz {
        crate::models::quizzes::entities::Quiz {
            id: self.id,
            course_version_id: self.course_version_id,
            lesson_id: self.lesson_id,
            title: self.title,
            max_attempts: self.max_attempts,
            time_limit_minutes: self.time_limit_minutes,
            passing_score: self.passing_score,
            randomize_questions: self.randomize_questions,
            randomize_options: self.randomize_options,
            total_points: self.total_points,
            is_final_exam: self.is_final_exam,
            questions,
        }
    }
}
