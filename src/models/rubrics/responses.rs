use serde::Serialize;

use super::entities::Rubric;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize)]
pub struct RubricListResponse {
    pub items: Vec<Rubric>,
    pub pagination: PaginationInfo,
}
