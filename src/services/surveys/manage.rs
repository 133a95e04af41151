use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SurveyService;
use crate::models::access::entities::Permission;
use crate::models::surveys::entities::{Survey, SurveyStatus};
use crate::models::surveys::requests::{
    CreateSurveyRequest, SurveyListQuery, UpdateSurveyRequest,
};
use crate::models::surveys::responses::SurveyDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::moderation;
use crate::utils::validate::validate_required_text;

const MAX_TITLE_CHARS: usize = 200;

/// 状态只能前进：draft -> published -> closed
fn check_transition(from: SurveyStatus, to: SurveyStatus) -> Result<(), String> {
    let allowed = from == to
        || matches!(
            (from, to),
            (SurveyStatus::Draft, SurveyStatus::Published)
                | (SurveyStatus::Published, SurveyStatus::Closed)
                | (SurveyStatus::Draft, SurveyStatus::Closed)
        );
    if allowed {
        Ok(())
    } else {
        Err(format!("问卷状态不能从 {from} 变更为 {to}"))
    }
}

fn check_closes_at(closes_at: Option<chrono::DateTime<chrono::Utc>>) -> Result<(), &'static str> {
    match closes_at {
        Some(at) if at <= chrono::Utc::now() => Err("closes_at 必须晚于当前时间"),
        _ => Ok(()),
    }
}

pub async fn list_surveys(
    service: &SurveyService,
    query: SurveyListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    crate::services::ensure_permission(request, Permission::SurveyManage).await?;
    let storage = service.get_storage(request)?;

    match storage.list_surveys_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Surveys retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list surveys: {e}"),
            )),
        ),
    }
}

pub async fn create_survey(
    service: &SurveyService,
    mut req: CreateSurveyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    crate::services::ensure_permission(request, Permission::SurveyManage).await?;
    let storage = service.get_storage(request)?;
    let user = crate::services::current_user(request)?;

    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_required_text(&req.title, MAX_TITLE_CHARS) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
    }
    if let Err(msg) = check_closes_at(req.closes_at) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    match storage.create_survey(req, user.id).await {
        Ok(survey) => {
            info!("Survey {} created by {}", survey.id, user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                survey,
                "Survey created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create survey: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create survey: {e}"),
                )),
            )
        }
    }
}

pub async fn get_survey(
    service: &SurveyService,
    survey_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;
    let questions = storage.list_questions(survey.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SurveyDetailResponse { survey, questions },
        "Survey retrieved successfully",
    )))
}

/// 发布前至少要有一道题
async fn check_update(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    survey: &Survey,
    req: &UpdateSurveyRequest,
) -> crate::errors::Result<Result<(), String>> {
    if let Some(status) = req.status {
        if let Err(msg) = check_transition(survey.status, status) {
            return Ok(Err(msg));
        }
        if status == SurveyStatus::Published
            && survey.status == SurveyStatus::Draft
            && storage.list_questions(survey.id).await?.is_empty()
        {
            return Ok(Err("没有题目的问卷不能发布".to_string()));
        }
    }
    if let Err(msg) = check_closes_at(req.closes_at) {
        return Ok(Err(msg.to_string()));
    }
    Ok(Ok(()))
}

pub async fn update_survey(
    service: &SurveyService,
    survey_id: i64,
    mut req: UpdateSurveyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    if let Some(title) = req.title.take() {
        let title = title.trim().to_string();
        if let Err(msg) = validate_required_text(&title, MAX_TITLE_CHARS) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
        }
        req.title = Some(title);
    }
    if let Err(msg) = check_update(&storage, &survey, &req).await? {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    match storage.update_survey(survey.id, req).await {
        Ok(Some(updated)) => {
            if updated.status != survey.status {
                info!(
                    "Survey {} moved from {} to {}",
                    updated.id, survey.status, updated.status
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Survey updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => {
            error!("Failed to update survey {}: {}", survey_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update survey: {e}"),
                )),
            )
        }
    }
}

pub async fn delete_survey(
    service: &SurveyService,
    survey_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    match storage.delete_survey(survey.id).await {
        Ok(true) => {
            info!("Survey {} deleted", survey.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Survey deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => {
            error!("Failed to delete survey {}: {}", survey_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete survey: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_moves_forward() {
        assert!(check_transition(SurveyStatus::Draft, SurveyStatus::Published).is_ok());
        assert!(check_transition(SurveyStatus::Published, SurveyStatus::Closed).is_ok());
        assert!(check_transition(SurveyStatus::Closed, SurveyStatus::Closed).is_ok());
        assert!(check_transition(SurveyStatus::Closed, SurveyStatus::Published).is_err());
        assert!(check_transition(SurveyStatus::Published, SurveyStatus::Draft).is_err());
    }

    #[test]
    fn closes_at_must_be_in_the_future() {
        assert!(check_closes_at(None).is_ok());
        assert!(check_closes_at(Some(chrono::Utc::now() + chrono::Duration::days(1))).is_ok());
        assert!(check_closes_at(Some(chrono::Utc::now() - chrono::Duration::days(1))).is_err());
    }
}
