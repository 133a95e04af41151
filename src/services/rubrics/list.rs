use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RubricService;
use crate::models::access::entities::Permission;
use crate::models::rubrics::requests::RubricListQuery;
use crate::models::{ApiResponse, ErrorCode};

/// 按方案/课程列出量表；院系范围内的授权必须指定方案
pub async fn list_rubrics(
    service: &RubricService,
    query: RubricListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match query.framework_id {
        Some(framework_id) => {
            let framework = crate::services::load_framework(&storage, framework_id).await?;
            crate::services::ensure_framework_permission(
                request,
                Permission::RubricManage,
                &framework,
            )
            .await?;
        }
        None => {
            let permissions = crate::services::request_permissions(request).await?;
            if !permissions.allows(Permission::RubricManage, None) {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "framework_id is required",
                )));
            }
        }
    }

    match storage.list_rubrics_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Rubrics retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list rubrics: {e}"),
            )),
        ),
    }
}
