use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::RubricService;
use super::create::{MAX_TITLE_CHARS, definition_rejection};
use crate::models::rubrics::requests::UpdateRubricRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::frameworks::outcomes::ensure_course_in_framework;
use crate::utils::moderation;
use crate::utils::validate::validate_required_text;

pub async fn update_rubric(
    service: &RubricService,
    rubric_id: i64,
    mut req: UpdateRubricRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, rubric, framework) = service.load_scoped(request, rubric_id).await?;

    if let Some(title) = req.title.take() {
        let title = title.trim().to_string();
        if let Err(msg) = validate_required_text(&title, MAX_TITLE_CHARS) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        req.title = Some(title);
    }
    moderation::check_optional("description", req.description.as_deref())?;

    if let Some(course_id) = req.course_id {
        ensure_course_in_framework(&storage, framework.id, course_id).await?;
    }
    if let Some(definition) = &req.definition
        && let Some(rejection) = definition_rejection(&storage, framework.id, definition).await?
    {
        return Ok(rejection);
    }

    match storage.update_rubric(rubric.id, req).await {
        Ok(Some(rubric)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            rubric,
            "Rubric updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "Rubric not found",
        ))),
        Err(e) => {
            error!("Failed to update rubric {}: {}", rubric_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update rubric: {e}"),
                )),
            )
        }
    }
}
