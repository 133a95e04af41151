//! 观察项得分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "observation_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub observation_id: i64,
    pub row_key: String,
    pub clo_id: Option<i64>,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    pub comment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::observations::Entity",
        from = "Column::ObservationId",
        to = "super::observations::Column::Id",
        on_delete = "Cascade"
    )]
    Observations,
}

impl Related<super::observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_item(self) -> crate::models::observations::entities::ObservationItem {
        crate::models::observations::entities::ObservationItem {
            id: self.id,
            observation_id: self.observation_id,
            row_key: self.row_key,
            clo_id: self.clo_id,
            score: self.score,
            max_score: self.max_score,
            weight: self.weight,
            comment: self.comment,
        }
    }
}
