use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::SurveyService;
use super::answers::validate_answers;
use crate::errors::{AqmsError, Result};
use crate::models::surveys::entities::{
    AnswerValue, AssignmentStatus, QuestionKind, Survey, SurveyAssignment,
};
use crate::models::surveys::requests::SubmitSurveyRequest;
use crate::models::surveys::responses::SurveyDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::moderation;

/// 按令牌取邀请与问卷；邀请不可用时给出对应的拒绝响应
async fn resolve(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<std::result::Result<(SurveyAssignment, Survey), HttpResponse>> {
    let Some(assignment) = storage.get_survey_assignment_by_token(token).await? else {
        return Ok(Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyAssignmentNotFound,
            "Survey invitation not found",
        ))));
    };
    let survey = storage
        .get_survey_by_id(assignment.survey_id)
        .await?
        .ok_or_else(|| AqmsError::not_found("Survey not found"))?;

    match assignment.status {
        AssignmentStatus::Completed => {
            return Ok(Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SurveyAlreadyResponded,
                "该邀请已完成作答",
            ))));
        }
        AssignmentStatus::Revoked => {
            return Ok(Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SurveyNotAvailable,
                "该邀请已被撤销",
            ))));
        }
        AssignmentStatus::Pending => {}
    }
    if !survey.is_open(chrono::Utc::now()) {
        return Ok(Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotAvailable,
            "问卷未发布或已截止",
        ))));
    }

    Ok(Ok((assignment, survey)))
}

pub async fn get_public_survey(
    service: &SurveyService,
    token: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (_, survey) = match resolve(&storage, &token).await? {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };
    let questions = storage.list_questions(survey.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SurveyDetailResponse { survey, questions },
        "Survey retrieved successfully",
    )))
}

pub async fn submit_responses(
    service: &SurveyService,
    token: String,
    req: SubmitSurveyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (assignment, survey) = match resolve(&storage, &token).await? {
        Ok(found) => found,
        Err(response) => return Ok(response),
    };
    let questions = storage.list_questions(survey.id).await?;

    let answers = match validate_answers(&questions, req.answers) {
        Ok(answers) => answers,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SurveyAnswerInvalid, msg)));
        }
    };

    // 只审核自由文本，选项文字由问卷管理者给出
    for (question_id, value) in &answers {
        if let AnswerValue::Text(text) = value
            && questions
                .iter()
                .any(|q| q.id == *question_id && q.kind == QuestionKind::Text)
        {
            moderation::check_text("answer", text)?;
        }
    }

    match storage.submit_survey_responses(&assignment, answers).await {
        Ok(()) => {
            info!(
                "Survey {}: assignment {} completed",
                survey.id, assignment.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::<()>::success_empty(
                "Survey response submitted successfully",
            )))
        }
        // 并发提交时条件更新未命中
        Err(AqmsError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyAlreadyResponded, msg))),
        Err(e) => {
            error!(
                "Failed to store responses for assignment {}: {}",
                assignment.id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to submit survey response: {e}"),
                )),
            )
        }
    }
}
