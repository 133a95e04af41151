use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FrameworkService, create::validate_framework_text};
use crate::models::access::entities::Permission;
use crate::models::frameworks::requests::UpdateFrameworkRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::request_permissions;
use crate::utils::moderation;
use crate::utils::validate::validate_code;

pub async fn update_framework(
    service: &FrameworkService,
    id: i64,
    mut req: UpdateFrameworkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, framework) = service
        .authorize(request, id, Permission::FrameworkManage)
        .await?;

    // 迁往其他院系时同样需要目标院系的权限
    if let Some(department_id) = req.department_id
        && framework.department_id != Some(department_id)
    {
        if !request_permissions(request)
            .await?
            .allows(Permission::FrameworkManage, Some(department_id))
        {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Missing permission for target department",
            )));
        }
        if storage.get_department_by_id(department_id).await?.is_none() {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::DepartmentNotFound,
                "Department not found",
            )));
        }
    }

    if let Some(code) = req.code.take() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        if let Some(other) = storage.get_framework_by_code(&code).await?
            && other.id != id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::FrameworkAlreadyExists,
                format!("培养方案代码 {code} 已存在"),
            )));
        }
        req.code = Some(code);
    }

    if let Err(msg) = validate_framework_text(
        req.name.as_deref().unwrap_or(&framework.name),
        req.major.as_deref().unwrap_or(&framework.major),
        req.cohort.as_deref().unwrap_or(&framework.cohort),
        req.academic_year.as_deref().unwrap_or(&framework.academic_year),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    match storage.update_framework(id, req).await {
        Ok(Some(framework)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            framework,
            "Framework updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FrameworkNotFound,
            "Framework not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update framework: {e}"),
            )),
        ),
    }
}
