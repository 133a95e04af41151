//! PI 实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub framework_id: i64,
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
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
}

impl Related<super::frameworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frameworks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_outcome(self) -> crate::models::frameworks::entities::Outcome {
        use crate::models::frameworks::entities::{Outcome, OutcomeKind};
        use chrono::{DateTime, Utc};

        Outcome {
            id: self.id,
            kind: OutcomeKind::Pi,
            framework_id: self.framework_id,
            course_id: None,
            code: self.code,
            description: self.description,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
