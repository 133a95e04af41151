//! 问卷邀请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "survey_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    #[sea_orm(unique)]
    pub token: String,
    pub invitee_email: Option<String>,
    pub invitee_user_id: Option<i64>,
    pub status: String,
    pub completed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id",
        on_delete = "Cascade"
    )]
    Surveys,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Surveys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::surveys::entities::SurveyAssignment {
        use crate::models::surveys::entities::{AssignmentStatus, SurveyAssignment};
        use chrono::{DateTime, Utc};

        SurveyAssignment {
            id: self.id,
            survey_id: self.survey_id,
            token: self.token,
            invitee_email: self.invitee_email,
            invitee_user_id: self.invitee_user_id,
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Pending),
            completed_at: self
                .completed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
