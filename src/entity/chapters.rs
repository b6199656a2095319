//! 章节实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chapters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_version_id: i64,
    pub title: String,
    pub order_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_versions::Entity",
        from = "Column::CourseVersionId",
        to = "super::course_versions::Column::Id"
    )]
    CourseVersion,
    #[sea_orm(has_many = "super::lessons::Entity")]
    Lessons,
}

impl Related<super::course_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseVersion.def()
    }
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装章节（课时由调用方按顺序传入）
    pub fn into_chapter(
        self,
        lessons: Vec<crate::models::courses::entities::Lesson>,
    ) -> crate::models::courses::entities::Chapter {
        crate::models::courses::entities::Chapter {
            id: self.id,
            course_version_id: self.course_version_id,
            title: self.title,
            order_index: self.order_index,
            lessons,
        }
    }
}
