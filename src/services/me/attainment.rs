use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::attainment::student_attainment;

/// 本人全部 CLO 结果，最新的在前
pub async fn get_clo_results(
    service: &MeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, student) = service.current_student(request).await?;

    match storage.list_student_clo_results(student.id).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            results,
            "CLO results retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load CLO results: {e}"),
            )),
        ),
    }
}

pub async fn get_attainment(
    service: &MeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, student) = service.current_student(request).await?;
    let attainment = student_attainment(&storage, &student).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        attainment,
        "Attainment retrieved successfully",
    )))
}
