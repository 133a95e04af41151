use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MeService;
use crate::models::ApiResponse;
use crate::models::students::responses::StudentProfileResponse;

pub async fn get_profile(service: &MeService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let (storage, student) = service.current_student(request).await?;
    let framework = crate::services::load_framework(&storage, student.framework_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentProfileResponse {
            student,
            framework_code: framework.code,
            framework_name: framework.name,
            major: framework.major,
            cohort: framework.cohort,
        },
        "Profile retrieved successfully",
    )))
}
