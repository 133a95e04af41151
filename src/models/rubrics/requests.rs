use serde::Deserialize;

use super::entities::RubricDefinition;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RubricListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub framework_id: Option<i64>,
    pub course_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRubricRequest {
    pub framework_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub definition: RubricDefinition,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRubricRequest {
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub definition: Option<RubricDefinition>,
}
