//! 问卷实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "surveys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub anonymous: bool,
    pub status: String,
    pub closes_at: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::survey_questions::Entity")]
    SurveyQuestions,
    #[sea_orm(has_many = "super::survey_assignments::Entity")]
    SurveyAssignments,
    #[sea_orm(has_many = "super::survey_responses::Entity")]
    SurveyResponses,
}

impl Related<super::survey_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyQuestions.def()
    }
}

impl Related<super::survey_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyAssignments.def()
    }
}

impl Related<super::survey_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyResponses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_survey(self) -> crate::models::surveys::entities::Survey {
        use crate::models::surveys::entities::{Survey, SurveyStatus};
        use chrono::{DateTime, Utc};

        Survey {
            id: self.id,
            title: self.title,
            description: self.description,
            anonymous: self.anonymous,
            status: self
                .status
                .parse::<SurveyStatus>()
                .unwrap_or(SurveyStatus::Draft),
            closes_at: self
                .closes_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
