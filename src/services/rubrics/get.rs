use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::ApiResponse;

pub async fn get_rubric(
    service: &RubricService,
    rubric_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, rubric, _) = service.load_scoped(request, rubric_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        rubric,
        "Rubric retrieved successfully",
    )))
}
