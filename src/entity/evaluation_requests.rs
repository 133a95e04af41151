//! 评价请求实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub campaign_id: i64,
    pub evaluator_id: i64,
    /// 被评价学生（students.id）
    pub evaluatee_id: i64,
    pub group_role: String,
    pub status: String,
    pub observation_id: Option<i64>,
    pub submitted_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluation_campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::evaluation_campaigns::Column::Id",
        on_delete = "Cascade"
    )]
    EvaluationCampaigns,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::EvaluateeId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Students,
}

impl Related<super::evaluation_campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationCampaigns.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_request(self) -> crate::models::evaluations::entities::EvaluationRequest {
        use crate::models::evaluations::entities::{EvaluationRequest, GroupRole, RequestStatus};
        use chrono::{DateTime, Utc};

        EvaluationRequest {
            id: self.id,
            campaign_id: self.campaign_id,
            evaluator_id: self.evaluator_id,
            evaluatee_id: self.evaluatee_id,
            group_role: self
                .group_role
                .parse::<GroupRole>()
                .unwrap_or(GroupRole::Peer),
            status: self
                .status
                .parse::<RequestStatus>()
                .unwrap_or(RequestStatus::Pending),
            observation_id: self.observation_id,
            submitted_at: self
                .submitted_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
