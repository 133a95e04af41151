//! 360° 评价活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub framework_id: i64,
    pub rubric_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: i64,
    pub end_at: i64,
    pub status: String,
    pub created_by: Option<i64>,
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
    #[sea_orm(
        belongs_to = "super::rubrics::Entity",
        from = "Column::RubricId",
        to = "super::rubrics::Column::Id",
        on_delete = "Restrict"
    )]
    Rubrics,
    #[sea_orm(has_many = "super::evaluation_requests::Entity")]
    EvaluationRequests,
}

impl Related<super::frameworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frameworks.def()
    }
}

impl Related<super::rubrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubrics.def()
    }
}

impl Related<super::evaluation_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_campaign(self) -> crate::models::evaluations::entities::EvaluationCampaign {
        use crate::models::evaluations::entities::{CampaignStatus, EvaluationCampaign};
        use chrono::{DateTime, Utc};

        EvaluationCampaign {
            id: self.id,
            framework_id: self.framework_id,
            rubric_id: self.rubric_id,
            title: self.title,
            description: self.description,
            start_at: DateTime::<Utc>::from_timestamp(self.start_at, 0).unwrap_or_default(),
            end_at: DateTime::<Utc>::from_timestamp(self.end_at, 0).unwrap_or_default(),
            status: self
                .status
                .parse::<CampaignStatus>()
                .unwrap_or(CampaignStatus::Draft),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
