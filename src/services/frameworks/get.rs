use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use crate::models::ApiResponse;
use crate::models::access::entities::Permission;

pub async fn get_framework(
    service: &FrameworkService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, framework) = service
        .authorize(request, id, Permission::FrameworkView)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        framework,
        "Framework retrieved successfully",
    )))
}
