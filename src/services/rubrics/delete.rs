use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::RubricService;
use crate::models::{ApiResponse, ErrorCode};

/// 被观察记录或评价活动引用的量表不可删除
pub async fn delete_rubric(
    service: &RubricService,
    rubric_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, rubric, _) = service.load_scoped(request, rubric_id).await?;

    let references = storage.count_rubric_references(rubric.id).await?;
    if references > 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RubricInUse,
            format!("量表已被 {references} 条观察记录或评价活动引用，不能删除"),
        )));
    }

    match storage.delete_rubric(rubric.id).await {
        Ok(true) => {
            info!("Rubric {} deleted", rubric.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Rubric deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "Rubric not found",
        ))),
        Err(e) => {
            error!("Failed to delete rubric {}: {}", rubric_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete rubric: {e}"),
                )),
            )
        }
    }
}
