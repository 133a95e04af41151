use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ApiResponse;
use crate::models::access::entities::Permission;

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, student, _) = service
        .load_scoped(request, student_id, Permission::FrameworkView)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Student retrieved successfully",
    )))
}
