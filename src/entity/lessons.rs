//! 课时实体

use sea_orm::entity::prelude::*;

use crate::errors::LmsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub chapter_id: i64,
    pub course_version_id: i64,
    pub title: String,
    pub lesson_type: String,
    pub duration_seconds: i64,
    pub order_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chapters::Entity",
        from = "Column::ChapterId",
        to = "super::chapters::Column::Id"
    )]
    Chapter,
    #[sea_orm(has_many = "super::progress::Entity")]
    Progress,
}

impl Related<super::chapters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chapter.def()
    }
}

impl Related<super::progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lesson(self) -> crate::errors::Result<crate::models::courses::entities::Lesson> {
        Ok(crate::models::courses::entities::Lesson {
            id: self.id,
            chapter_id: self.chapter_id,
            course_version_id: self.course_version_id,
            title: self.title,
            lesson_type: self.lesson_type.parse().map_err(LmsError::serialization)?,
            duration_seconds: self.duration_seconds,
            order_index: self.order_index,
        })
    }
}
