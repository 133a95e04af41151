//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub framework_id: i64,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub semester: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::frameworks::Entity",
        from = "Column::FrameworkId",
        to = "super::frameworks::Column::Id",
        on_delete = "Cascade"
    )]
    Frameworks,
    #[sea_orm(has_many = "super::clos::Entity")]
    Clos,
}

impl Related<super::frameworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frameworks.def()
    }
}

impl Related<super::clos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> crate::models::frameworks::entities::Course {
        use chrono::{DateTime, Utc};

        crate::models::frameworks::entities::Course {
            id: self.id,
            framework_id: self.framework_id,
            code: self.code,
            name: self.name,
            credits: self.credits,
            semester: self.semester,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
