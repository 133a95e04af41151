use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ObservationService;
use super::scoring::{ScoredItems, moderate_comments, score_items};
use crate::config::AppConfig;
use crate::models::access::entities::Permission;
use crate::models::observations::entities::{NewObservation, ObservationSource};
use crate::models::observations::requests::CreateObservationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::frameworks::outcomes::ensure_course_in_framework;

/// 录入一次直接观察，评分项与 CLO 结果同一事务写入
pub async fn create_observation(
    service: &ObservationService,
    req: CreateObservationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (rubric, framework) = service
        .rubric_scope(&storage, request, req.rubric_id, Permission::ObservationCreate)
        .await?;
    let observer = crate::services::current_user(request)?;

    match storage.get_student_by_id(req.student_id).await? {
        Some(student) if student.framework_id == framework.id => {}
        Some(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "学生与量表不属于同一培养方案",
            )));
        }
        None => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
    }

    let course_id = req.course_id.or(rubric.course_id);
    if let Some(course_id) = course_id {
        ensure_course_in_framework(&storage, framework.id, course_id).await?;
    }

    moderate_comments(&req.items, req.comment.as_deref())?;

    let threshold = rubric
        .definition
        .effective_pass_threshold(AppConfig::get().assessment.default_pass_threshold);
    let ScoredItems {
        items,
        total_score,
        max_score,
        clo_results,
    } = match score_items(&rubric.definition, &req.items, threshold) {
        Ok(scored) => scored,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ScoresInvalid, msg)));
        }
    };

    let observation = NewObservation {
        student_id: req.student_id,
        rubric_id: rubric.id,
        observer_id: Some(observer.id),
        course_id,
        source: ObservationSource::Direct,
        total_score,
        max_score,
        comment: req
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        observed_at: req.observed_at.unwrap_or_else(chrono::Utc::now),
        items,
        clo_results,
    };

    match storage.create_observation(observation).await {
        Ok(detail) => {
            info!(
                "Observation {} recorded for student {} by {}",
                detail.observation.id, req.student_id, observer.username
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                detail,
                "Observation created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create observation: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create observation: {e}"),
                )),
            )
        }
    }
}
