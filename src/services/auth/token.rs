use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::responses::RefreshTokenResponse;
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn unauthorized(message: &str) -> HttpResponse {
    let [access, refresh] = JwtUtils::create_empty_token_cookies();
    HttpResponse::Unauthorized()
        .cookie(access)
        .cookie(refresh)
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(unauthorized("Login expired or invalid, please login again"));
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(unauthorized("Login expired or invalid, please login again"));
    };

    // 账号被删除或停用后刷新令牌随之失效
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(unauthorized("Account is not available, please login again")),
        Err(e) => {
            tracing::error!("Refresh token user lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Refresh failed: {e}"),
                )),
            );
        }
    };

    match JwtUtils::generate_access_token(user.id, &user.account_type.to_string()) {
        Ok(access_token) => {
            let cookie = JwtUtils::create_access_token_cookie(&access_token);
            let response = RefreshTokenResponse {
                access_token,
                token_type: "Bearer",
                expires_in: config.jwt.access_token_expiry * 60,
            };
            Ok(HttpResponse::Ok()
                .cookie(cookie)
                .json(ApiResponse::success(response, "Token refreshed successfully")))
        }
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Refresh failed, unable to generate token",
                )),
            )
        }
    }
}
