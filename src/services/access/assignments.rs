use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AccessService, permissions::invalidate_permissions};
use crate::errors::AqmsError;
use crate::models::access::requests::AssignRoleRequest;
use crate::models::users::entities::AccountType;
use crate::models::{ApiResponse, ErrorCode, ListResponse};

pub async fn list_assignments(
    service: &AccessService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_user_by_id(user_id).await?.is_none() {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    }

    match storage.list_user_role_assignments(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Role assignments retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list role assignments: {e}"),
            )),
        ),
    }
}

/// 为教职工分配角色，可限定院系
pub async fn assign_role(
    service: &AccessService,
    user_id: i64,
    req: AssignRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
    };
    if user.account_type == AccountType::Student {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "学生账号不能分配角色",
        )));
    }

    if let Some(department_id) = req.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        )));
    }

    match storage
        .assign_role(user_id, req.role_id, req.department_id)
        .await
    {
        Ok(assignment) => {
            invalidate_permissions(&service.get_cache(request)?, &[user_id]).await;
            tracing::info!(
                "Role {} assigned to user {} (department {:?})",
                assignment.role_code,
                user.username,
                assignment.department_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Role assigned successfully",
            )))
        }
        Err(AqmsError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::RoleNotFound, msg))),
        Err(AqmsError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::Conflict, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to assign role: {e}"),
            )),
        ),
    }
}

pub async fn revoke_role(
    service: &AccessService,
    user_id: i64,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.revoke_role(user_id, assignment_id).await {
        Ok(true) => {
            invalidate_permissions(&service.get_cache(request)?, &[user_id]).await;
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Role assignment revoked successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoleAssignmentNotFound,
            "Role assignment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to revoke role assignment: {e}"),
            )),
        ),
    }
}
