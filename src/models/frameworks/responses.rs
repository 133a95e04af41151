use serde::Serialize;

use super::entities::Framework;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize)]
pub struct FrameworkListResponse {
    pub items: Vec<Framework>,
    pub pagination: PaginationInfo,
}
