use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::extract_access_token;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode, auth::requests::ChangePasswordRequest};
use crate::services::current_user;
use crate::utils::password::{hash_password_blocking, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 缓存里的用户不带密码哈希，重新查库
    let stored = match storage.get_user_by_id(user.id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "用户不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询用户失败: {e}"),
                )),
            );
        }
    };

    if !verify_password(&change_request.current_password, &stored.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CurrentPasswordIncorrect,
            "当前密码不正确",
        )));
    }

    let policy = validate_password(&change_request.new_password);
    if !policy.is_valid {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            policy.error_message(),
        )));
    }

    let password_hash = hash_password_blocking(change_request.new_password).await?;
    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(_) => {
            // 让当前令牌的缓存用户失效
            if let Some(token) = extract_access_token(request) {
                service
                    .get_cache(request)?
                    .remove(&format!("user:{token}"))
                    .await;
            }
            tracing::info!("User {} changed password", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("密码已修改")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("修改密码失败: {e}"),
            )),
        ),
    }
}
