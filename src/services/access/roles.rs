use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AccessService, permissions::invalidate_permissions};
use crate::models::access::requests::{CreateRoleRequest, UpdateRoleRequest};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn list_roles(
    service: &AccessService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_roles().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Roles retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list roles: {e}"),
            )),
        ),
    }
}

pub async fn get_role(
    service: &AccessService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_role_by_id(id).await {
        Ok(Some(role)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(role, "Role retrieved successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::RoleNotFound, "Role not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get role: {e}"),
            )),
        ),
    }
}

pub async fn create_role(
    service: &AccessService,
    mut req: CreateRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.trim().to_string();
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_required_text(&req.name, 100) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    req.permissions.sort_by_key(|p| p.as_str());
    req.permissions.dedup();

    let storage = service.get_storage(request)?;

    if storage.get_role_by_code(&req.code).await?.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::RoleAlreadyExists,
            format!("角色代码 {} 已存在", req.code),
        )));
    }

    match storage.create_role(req).await {
        Ok(role) => {
            tracing::info!("Role {} created with {} permissions", role.code, role.permissions.len());
            Ok(HttpResponse::Created().json(ApiResponse::success(role, "Role created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create role: {e}"),
            )),
        ),
    }
}

/// 更新角色，权限列表变化时让持有者的权限缓存失效
pub async fn update_role(
    service: &AccessService,
    id: i64,
    mut req: UpdateRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &req.name
        && let Err(msg) = validate_required_text(name, 100)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Some(permissions) = req.permissions.as_mut() {
        permissions.sort_by_key(|p| p.as_str());
        permissions.dedup();
    }
    let permissions_changed = req.permissions.is_some();

    let storage = service.get_storage(request)?;

    match storage.update_role(id, req).await {
        Ok(Some(role)) => {
            if permissions_changed {
                let holders = storage.list_role_user_ids(id).await?;
                invalidate_permissions(&service.get_cache(request)?, &holders).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(role, "Role updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::RoleNotFound, "Role not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update role: {e}"),
            )),
        ),
    }
}

pub async fn delete_role(
    service: &AccessService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 分配记录随角色级联删除，先记下持有者
    let holders = storage.list_role_user_ids(id).await?;

    match storage.delete_role(id).await {
        Ok(true) => {
            invalidate_permissions(&service.get_cache(request)?, &holders).await;
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Role deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::RoleNotFound, "Role not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete role: {e}"),
            )),
        ),
    }
}
