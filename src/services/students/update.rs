use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::access::entities::Permission;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_code, validate_email, validate_required_text};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut req: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, student, _) = service
        .load_scoped(request, student_id, Permission::FrameworkManage)
        .await?;

    // 转到其他方案时需要目标方案的管理权限
    if let Some(target_id) = req.framework_id
        && target_id != student.framework_id
    {
        let target = crate::services::load_framework(&storage, target_id).await?;
        crate::services::ensure_framework_permission(request, Permission::FrameworkManage, &target)
            .await?;
    }

    if let Some(code) = req.student_code.take() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        if let Some(other) = storage.get_student_by_code(&code).await?
            && other.id != student_id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                format!("学号 {code} 已存在"),
            )));
        }
        req.student_code = Some(code);
    }

    if let Some(name) = req.full_name.take() {
        let name = name.trim().to_string();
        if let Err(msg) = validate_required_text(&name, 200) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        req.full_name = Some(name);
    }

    if let Some(email) = req.email.take() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if let Some(other) = storage.get_user_by_email(&email).await?
            && other.id != student.user_id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                format!("邮箱 {email} 已被占用"),
            )));
        }
        req.email = Some(email);
    }

    match storage.update_student(student_id, req).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => {
            error!("Failed to update student {}: {}", student_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update student: {e}"),
                )),
            )
        }
    }
}
