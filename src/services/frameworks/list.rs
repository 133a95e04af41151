use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use crate::models::access::entities::Permission;
use crate::models::frameworks::requests::FrameworkListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ensure_permission;

pub async fn list_frameworks(
    service: &FrameworkService,
    query: FrameworkListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    ensure_permission(request, Permission::FrameworkView).await?;
    let storage = service.get_storage(request)?;

    match storage.list_frameworks_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Frameworks retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list frameworks: {e}"),
            )),
        ),
    }
}
