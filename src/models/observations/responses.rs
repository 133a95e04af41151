use serde::Serialize;

use super::entities::Observation;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize)]
pub struct ObservationListResponse {
    pub items: Vec<Observation>,
    pub pagination: PaginationInfo,
}
