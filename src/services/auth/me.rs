use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::auth::responses::MeResponse;
use crate::services::{current_user, request_permissions};

use super::AuthService;

pub async fn handle_me(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let permissions = request_permissions(request).await?;

    let response = MeResponse {
        is_admin: permissions.is_admin,
        permissions: permissions.grants,
        user,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Current user retrieved successfully")))
}
