use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::StudentService;
use crate::models::access::entities::Permission;
use crate::models::{ApiResponse, ErrorCode};

/// 删除学生及其登录账号
pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, student, _) = service
        .load_scoped(request, student_id, Permission::FrameworkManage)
        .await?;

    match storage.delete_student(student_id).await {
        Ok(true) => {
            info!("Student {} deleted", student.student_code);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Student deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => {
            error!("Failed to delete student {}: {}", student_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete student: {e}"),
                )),
            )
        }
    }
}
