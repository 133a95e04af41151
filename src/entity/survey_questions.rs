//! 问卷题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "survey_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    pub position: i32,
    pub kind: String,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    /// JSON 数组格式的选项
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,
    pub scale: Option<i32>,
    pub required: bool,
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
    pub fn into_question(self) -> crate::models::surveys::entities::SurveyQuestion {
        use crate::models::surveys::entities::{QuestionKind, SurveyQuestion};

        let options = self
            .options
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default();

        SurveyQuestion {
            id: self.id,
            survey_id: self.survey_id,
            position: self.position,
            kind: self.kind.parse::<QuestionKind>().unwrap_or(QuestionKind::Text),
            prompt: self.prompt,
            options,
            scale: self.scale,
            required: self.required,
        }
    }
}
