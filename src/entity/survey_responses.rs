//! 问卷答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "survey_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    pub assignment_id: i64,
    pub question_id: i64,
    /// JSON 格式的作答值
    #[sea_orm(column_type = "Text")]
    pub answer: String,
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
    pub fn into_record(self) -> crate::models::surveys::entities::SurveyResponseRecord {
        use crate::models::surveys::entities::{AnswerValue, SurveyResponseRecord};
        use chrono::{DateTime, Utc};

        let answer = serde_json::from_str::<AnswerValue>(&self.answer)
            .unwrap_or(AnswerValue::Text(self.answer));

        SurveyResponseRecord {
            id: self.id,
            survey_id: self.survey_id,
            assignment_id: self.assignment_id,
            question_id: self.question_id,
            answer,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
