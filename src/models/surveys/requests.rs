use serde::Deserialize;

use super::entities::{AnswerValue, QuestionKind, SurveyStatus};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<SurveyStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurveyRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSurveyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub anonymous: Option<bool>,
    pub status: Option<SurveyStatus>,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub scale: Option<i32>,
    #[serde(default = "default_required")]
    pub required: bool,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestionRequest {
    pub kind: Option<QuestionKind>,
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub scale: Option<i32>,
    pub required: Option<bool>,
    pub position: Option<i32>,
}

fn default_required() -> bool {
    true
}

// 批量邀请
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssignmentsRequest {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyAnswer {
    pub question_id: i64,
    pub value: AnswerValue,
}

// 公开作答
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitSurveyRequest {
    pub answers: Vec<SurveyAnswer>,
}

/// 存储层新建邀请参数
#[derive(Debug, Clone)]
pub struct NewSurveyAssignment {
    pub token: String,
    pub invitee_email: Option<String>,
    pub invitee_user_id: Option<i64>,
}
