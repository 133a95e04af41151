use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::entities::AccountType;
use crate::models::users::responses::UserDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    };

    let roles = storage.list_user_role_assignments(user.id).await?;
    let student = match user.account_type {
        AccountType::Student => storage.get_student_by_user_id(user.id).await?,
        _ => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserDetailResponse {
            user,
            roles,
            student,
        },
        "User information retrieved successfully",
    )))
}
