use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::access::responses::PermissionInfo;
use crate::models::{ApiResponse, ListResponse};

pub async fn list_permissions(
    _service: &SystemService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ListResponse::new(PermissionInfo::catalogue()),
        "Permissions retrieved successfully",
    )))
}
