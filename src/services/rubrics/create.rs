use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::RubricService;
use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::OutcomeKind;
use crate::models::rubrics::entities::RubricDefinition;
use crate::models::rubrics::requests::CreateRubricRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::frameworks::outcomes::ensure_course_in_framework;
use crate::storage::Storage;
use crate::utils::moderation;
use crate::utils::validate::validate_required_text;

pub(crate) const MAX_TITLE_CHARS: usize = 200;

/// 校验量表结构，以及引用的 CLO 均属于该方案
pub(crate) async fn validate_definition(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    definition: &RubricDefinition,
) -> Result<()> {
    definition.validate().map_err(AqmsError::validation)?;

    for clo_id in definition.clo_ids() {
        match storage.get_outcome(OutcomeKind::Clo, clo_id).await? {
            Some(clo) if clo.framework_id == framework_id => {}
            _ => {
                return Err(AqmsError::validation(format!(
                    "CLO {clo_id} 不属于该培养方案"
                )));
            }
        }
    }
    Ok(())
}

/// 量表校验不通过时返回 400 响应
pub(crate) async fn definition_rejection(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    definition: &RubricDefinition,
) -> Result<Option<HttpResponse>> {
    match validate_definition(storage, framework_id, definition).await {
        Ok(()) => Ok(None),
        Err(AqmsError::Validation(msg)) => Ok(Some(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::RubricInvalid, msg)),
        )),
        Err(e) => Err(e),
    }
}

pub async fn create_rubric(
    service: &RubricService,
    mut req: CreateRubricRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, req.framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::RubricManage, &framework)
        .await?;
    let user = crate::services::current_user(request)?;

    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_required_text(&req.title, MAX_TITLE_CHARS) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    if let Some(course_id) = req.course_id {
        ensure_course_in_framework(&storage, framework.id, course_id).await?;
    }
    if let Some(rejection) = definition_rejection(&storage, framework.id, &req.definition).await? {
        return Ok(rejection);
    }

    match storage.create_rubric(req, user.id).await {
        Ok(rubric) => {
            info!("Rubric {} created in framework {}", rubric.id, framework.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                rubric,
                "Rubric created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create rubric: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create rubric: {e}"),
                )),
            )
        }
    }
}
