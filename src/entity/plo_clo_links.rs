//! plo_clo_links 映射实体，level 取值 1-4

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plo_clo_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plo_id: i64,
    pub clo_id: i64,
    pub level: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plos::Entity",
        from = "Column::PloId",
        to = "super::plos::Column::Id",
        on_delete = "Cascade"
    )]
    Source,
    #[sea_orm(
        belongs_to = "super::clos::Entity",
        from = "Column::CloId",
        to = "super::clos::Column::Id",
        on_delete = "Cascade"
    )]
    Target,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_link(self) -> crate::models::frameworks::entities::OutcomeLink {
        use crate::models::frameworks::entities::{LinkKind, OutcomeLink};
        use chrono::{DateTime, Utc};

        OutcomeLink {
            id: self.id,
            kind: LinkKind::PloClo,
            source_id: self.plo_id,
            target_id: self.clo_id,
            level: self.level,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
