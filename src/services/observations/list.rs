use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationService;
use crate::models::access::entities::Permission;
use crate::models::observations::requests::ObservationListQuery;
use crate::models::{ApiResponse, ErrorCode};

/// 院系范围内的授权须按学生或量表过滤
pub async fn list_observations(
    service: &ObservationService,
    query: ObservationListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let permissions = crate::services::request_permissions(request).await?;

    if !permissions.allows(Permission::ObservationView, None) {
        let framework_id = match (query.rubric_id, query.student_id) {
            (Some(rubric_id), _) => storage
                .get_rubric_by_id(rubric_id)
                .await?
                .map(|r| r.framework_id),
            (None, Some(student_id)) => storage
                .get_student_by_id(student_id)
                .await?
                .map(|s| s.framework_id),
            (None, None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "student_id or rubric_id is required",
                )));
            }
        };
        let Some(framework_id) = framework_id else {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "Filter target not found")));
        };
        let framework = crate::services::load_framework(&storage, framework_id).await?;
        crate::services::ensure_framework_permission(
            request,
            Permission::ObservationView,
            &framework,
        )
        .await?;
    }

    match storage.list_observations_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Observations retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list observations: {e}"),
            )),
        ),
    }
}
