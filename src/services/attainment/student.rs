use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttainmentService;
use crate::models::access::entities::Permission;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_student_attainment(
    service: &AttainmentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(student) = storage.get_student_by_id(student_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        )));
    };
    let framework = crate::services::load_framework(&storage, student.framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::ReportView, &framework)
        .await?;

    let attainment = super::student_attainment(&storage, &student).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        attainment,
        "Student attainment retrieved successfully",
    )))
}
