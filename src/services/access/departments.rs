use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AccessService;
use crate::models::access::requests::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::utils::validate::{validate_code, validate_required_text};

pub async fn list_departments(
    service: &AccessService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_departments().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Departments retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list departments: {e}"),
            )),
        ),
    }
}

pub async fn create_department(
    service: &AccessService,
    mut req: CreateDepartmentRequest,
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

    let storage = service.get_storage(request)?;

    if storage
        .list_departments()
        .await?
        .iter()
        .any(|d| d.code == req.code)
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::DepartmentAlreadyExists,
            format!("院系代码 {} 已存在", req.code),
        )));
    }

    match storage.create_department(req).await {
        Ok(department) => Ok(HttpResponse::Created().json(ApiResponse::success(
            department,
            "Department created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create department: {e}"),
            )),
        ),
    }
}

pub async fn update_department(
    service: &AccessService,
    id: i64,
    mut req: UpdateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(code) = req.code.take() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        if storage
            .list_departments()
            .await?
            .iter()
            .any(|d| d.code == code && d.id != id)
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::DepartmentAlreadyExists,
                format!("院系代码 {code} 已存在"),
            )));
        }
        req.code = Some(code);
    }
    if let Some(name) = &req.name
        && let Err(msg) = validate_required_text(name, 100)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    match storage.update_department(id, req).await {
        Ok(Some(department)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            department,
            "Department updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update department: {e}"),
            )),
        ),
    }
}

/// 删除院系；引用它的方案与角色分配随外键置空或级联
pub async fn delete_department(
    service: &AccessService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_department(id).await {
        Ok(true) => {
            // 院系范围的授权随之消失
            service.get_cache(request)?.invalidate_all().await;
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Department deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete department: {e}"),
            )),
        ),
    }
}
