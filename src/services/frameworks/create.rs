use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use crate::models::access::entities::Permission;
use crate::models::frameworks::requests::CreateFrameworkRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::request_permissions;
use crate::utils::moderation;
use crate::utils::validate::{validate_code, validate_required_text};

/// 方案文本字段的长度校验
pub(crate) fn validate_framework_text(
    name: &str,
    major: &str,
    cohort: &str,
    academic_year: &str,
) -> Result<(), String> {
    validate_required_text(name, 200).map_err(|e| format!("name: {e}"))?;
    validate_required_text(major, 200).map_err(|e| format!("major: {e}"))?;
    validate_required_text(cohort, 50).map_err(|e| format!("cohort: {e}"))?;
    validate_required_text(academic_year, 20).map_err(|e| format!("academic_year: {e}"))?;
    Ok(())
}

pub async fn create_framework(
    service: &FrameworkService,
    mut req: CreateFrameworkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let permissions = request_permissions(request).await?;
    if !permissions.allows(Permission::FrameworkManage, req.department_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            format!("Missing permission: {}", Permission::FrameworkManage),
        )));
    }

    req.code = req.code.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_framework_text(&req.name, &req.major, &req.cohort, &req.academic_year)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    let storage = service.get_storage(request)?;

    if let Some(department_id) = req.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        )));
    }

    if storage.get_framework_by_code(&req.code).await?.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::FrameworkAlreadyExists,
            format!("培养方案代码 {} 已存在", req.code),
        )));
    }

    match storage.create_framework(req).await {
        Ok(framework) => {
            tracing::info!("Framework {} created", framework.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                framework,
                "Framework created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create framework: {e}"),
            )),
        ),
    }
}
