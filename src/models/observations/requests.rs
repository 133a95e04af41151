use serde::Deserialize;

// 单行评分
#[derive(Debug, Clone, Deserialize)]
pub struct ItemScoreInput {
    pub row_key: String,
    pub score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateObservationRequest {
    pub student_id: i64,
    pub rubric_id: i64,
    pub course_id: Option<i64>,
    pub items: Vec<ItemScoreInput>,
    pub comment: Option<String>,
    pub observed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub rubric_id: Option<i64>,
    pub course_id: Option<i64>,
}
