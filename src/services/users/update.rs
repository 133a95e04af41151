use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{validate_email, validate_password};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if let Some(other) = storage.get_user_by_email(&email).await?
            && other.id != user_id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        update_data.email = Some(email);
    }

    if let Some(password) = update_data.password.take() {
        let policy = validate_password(&password);
        if !policy.is_valid {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PasswordPolicyViolation,
                policy.error_message(),
            )));
        }
        update_data.password = Some(hash_password_blocking(password).await?);
    }

    let account_type_changed = update_data.account_type.is_some();

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 账号类型影响管理员判定
            if account_type_changed {
                service
                    .get_cache(request)?
                    .remove(&format!("perms:{user_id}"))
                    .await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("Failed to update user information: {e}"),
        ))),
    }
}
