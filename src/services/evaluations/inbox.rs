use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::EvaluationService;
use crate::config::AppConfig;
use crate::errors::AqmsError;
use crate::models::access::entities::Permission;
use crate::models::evaluations::entities::RequestStatus;
use crate::models::evaluations::requests::{InboxQuery, SubmitEvaluationRequest};
use crate::models::evaluations::responses::{
    EvaluationRequestDetail, SubmitEvaluationResponse,
};
use crate::models::observations::entities::{NewObservation, ObservationSource};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::services::observations::scoring::{ScoredItems, moderate_comments, score_items};

/// 当前用户作为评价人的待办
pub async fn my_requests(
    service: &EvaluationService,
    query: InboxQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = crate::services::current_user(request)?;

    match storage.list_evaluator_inbox(user.id, query.status).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Evaluation inbox retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load evaluation inbox: {e}"),
            )),
        ),
    }
}

/// 评价人或活动管理者查看单个请求
pub async fn get_request(
    service: &EvaluationService,
    request_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = crate::services::current_user(request)?;

    let Some(evaluation) = storage.get_evaluation_request_by_id(request_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationRequestNotFound,
            "Evaluation request not found",
        )));
    };
    let Some(campaign) = storage.get_campaign_by_id(evaluation.campaign_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CampaignNotFound,
            "Campaign not found",
        )));
    };

    if evaluation.evaluator_id != user.id {
        let framework = crate::services::load_framework(&storage, campaign.framework_id).await?;
        crate::services::ensure_framework_permission(
            request,
            Permission::EvaluationManage,
            &framework,
        )
        .await?;
    }

    let rubric = storage
        .get_rubric_by_id(campaign.rubric_id)
        .await?
        .ok_or_else(|| AqmsError::not_found("Rubric not found"))?;
    let evaluatee = storage
        .get_student_by_id(evaluation.evaluatee_id)
        .await?
        .ok_or_else(|| AqmsError::not_found("Student not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EvaluationRequestDetail {
            request: evaluation,
            campaign,
            rubric,
            student_code: evaluatee.student_code,
            evaluatee_name: evaluatee.full_name,
        },
        "Evaluation request retrieved successfully",
    )))
}

/// 提交评价
///
/// 观察记录、CLO 结果与请求状态在同一事务内写入；请求已提交时返回 400。
pub async fn submit(
    service: &EvaluationService,
    request_id: i64,
    req: SubmitEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = crate::services::current_user(request)?;

    let Some(evaluation) = storage.get_evaluation_request_by_id(request_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationRequestNotFound,
            "Evaluation request not found",
        )));
    };
    if evaluation.evaluator_id != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotEvaluator,
            "Only the assigned evaluator can submit this evaluation",
        )));
    }
    if evaluation.status != RequestStatus::Pending {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EvaluationAlreadySubmitted,
            "Evaluation already submitted",
        )));
    }

    let Some(campaign) = storage.get_campaign_by_id(evaluation.campaign_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CampaignNotFound,
            "Campaign not found",
        )));
    };
    if let Err(msg) = campaign.accepts_submissions(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CampaignNotOpen, msg)));
    }

    let Some(rubric) = storage.get_rubric_by_id(campaign.rubric_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RubricNotFound,
            "Rubric not found",
        )));
    };

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
        student_id: evaluation.evaluatee_id,
        rubric_id: rubric.id,
        observer_id: Some(user.id),
        course_id: rubric.course_id,
        source: ObservationSource::Evaluation,
        total_score,
        max_score,
        comment: req
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        observed_at: chrono::Utc::now(),
        items,
        clo_results,
    };

    match storage.submit_evaluation(evaluation.id, observation).await {
        Ok((request, observation)) => {
            info!(
                "Evaluation request {} submitted by {} (observation {})",
                request.id, user.username, observation.observation.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmitEvaluationResponse {
                    request,
                    observation,
                },
                "Evaluation submitted successfully",
            )))
        }
        // 并发提交时条件更新未命中
        Err(AqmsError::Validation(msg)) => {
            warn!("Concurrent submission rejected for request {}", request_id);
            Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::EvaluationAlreadySubmitted, msg)))
        }
        Err(e) => Err(e.into()),
    }
}
