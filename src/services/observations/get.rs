use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::models::access::entities::Permission;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_observation(
    service: &ObservationService,
    observation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(detail) = storage.get_observation_detail(observation_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationNotFound,
            "Observation not found",
        )));
    };
    service
        .rubric_scope(
            &storage,
            request,
            detail.observation.rubric_id,
            Permission::ObservationView,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Observation retrieved successfully",
    )))
}
