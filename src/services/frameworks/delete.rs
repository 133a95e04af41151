use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use crate::models::access::entities::Permission;
use crate::models::{ApiResponse, ErrorCode};

/// 删除方案，课程、成果、映射与学生随外键级联删除
pub async fn delete_framework(
    service: &FrameworkService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, framework) = service
        .authorize(request, id, Permission::FrameworkManage)
        .await?;

    match storage.delete_framework(id).await {
        Ok(true) => {
            tracing::warn!("Framework {} deleted", framework.code);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Framework deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FrameworkNotFound,
            "Framework not found",
        ))),
        Err(e) => {
            let msg = format!("Failed to delete framework: {e}");
            // 量表仍被观察记录或评价活动引用
            if msg.contains("FOREIGN KEY constraint failed") {
                Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::RubricInUse,
                    "方案下的量表仍被观察记录或评价活动引用，无法删除",
                )))
            } else {
                tracing::error!("{}", msg);
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}
