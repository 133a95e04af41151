use serde::Serialize;

use super::entities::{QuestionKind, Survey, SurveyQuestion};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize)]
pub struct SurveyListResponse {
    pub items: Vec<Survey>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct SurveyDetailResponse {
    pub survey: Survey,
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: u64,
}

// 单题统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question_id: i64,
    pub prompt: String,
    pub kind: QuestionKind,
    pub answered: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_counts: Vec<OptionCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text_answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SurveyResultsResponse {
    pub survey: Survey,
    pub invited: u64,
    pub responded: u64,
    pub response_rate: f64,
    pub questions: Vec<QuestionResult>,
}
