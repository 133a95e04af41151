use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ObservationService;
use crate::models::access::entities::Permission;
use crate::models::observations::entities::ObservationSource;
use crate::models::{ApiResponse, ErrorCode};

/// 删除观察记录，评分项与 CLO 结果随外键级联删除
///
/// 360° 提交生成的观察挂在已提交的评价请求上，不允许单独删除。
pub async fn delete_observation(
    service: &ObservationService,
    observation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(detail) = storage.get_observation_detail(observation_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationNotFound,
            "Observation not found",
        )));
    };
    service
        .rubric_scope(
            &storage,
            request,
            detail.observation.rubric_id,
            Permission::ObservationCreate,
        )
        .await?;

    if detail.observation.source == ObservationSource::Evaluation {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ObservationLocked,
            "Observation belongs to a submitted evaluation and cannot be deleted",
        )));
    }

    match storage.delete_observation(observation_id).await {
        Ok(_) => {
            info!("Observation {} deleted", observation_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Observation deleted successfully",
            )))
        }
        Err(e) => {
            error!("Failed to delete observation {}: {}", observation_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete observation: {e}"),
                )),
            )
        }
    }
}
