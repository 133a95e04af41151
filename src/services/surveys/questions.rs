use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::error;

use super::SurveyService;
use crate::models::surveys::entities::{
    DEFAULT_RATING_SCALE, QuestionKind, Survey, SurveyQuestion, SurveyStatus,
};
use crate::models::surveys::requests::{CreateQuestionRequest, UpdateQuestionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_required_text;

const MAX_PROMPT_CHARS: usize = 1000;
const MAX_OPTION_CHARS: usize = 200;
const RATING_SCALE_RANGE: std::ops::RangeInclusive<i32> = 2..=10;

/// 题型与选项、量程的组合是否合法
pub(crate) fn validate_question(
    kind: QuestionKind,
    prompt: &str,
    options: &[String],
    scale: Option<i32>,
) -> Result<(), String> {
    validate_required_text(prompt, MAX_PROMPT_CHARS)?;

    match kind {
        QuestionKind::SingleChoice | QuestionKind::MultiChoice => {
            if options.len() < 2 {
                return Err("选择题至少需要两个选项".to_string());
            }
            let mut seen = HashSet::new();
            for option in options {
                validate_required_text(option, MAX_OPTION_CHARS)
                    .map_err(|msg| format!("选项无效: {msg}"))?;
                if !seen.insert(option.as_str()) {
                    return Err(format!("选项 '{option}' 重复"));
                }
            }
            if scale.is_some() {
                return Err("选择题不能设置 scale".to_string());
            }
        }
        QuestionKind::Rating => {
            if !options.is_empty() {
                return Err("评分题不能设置选项".to_string());
            }
            let scale = scale.unwrap_or(DEFAULT_RATING_SCALE);
            if !RATING_SCALE_RANGE.contains(&scale) {
                return Err(format!(
                    "评分量程必须在 {} 到 {} 之间",
                    RATING_SCALE_RANGE.start(),
                    RATING_SCALE_RANGE.end()
                ));
            }
        }
        QuestionKind::Text => {
            if !options.is_empty() || scale.is_some() {
                return Err("文本题不能设置选项或 scale".to_string());
            }
        }
    }
    Ok(())
}

fn not_editable(survey: &Survey) -> Option<HttpResponse> {
    (survey.status != SurveyStatus::Draft).then(|| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotEditable,
            format!("问卷状态为 {}，只能在草稿状态下修改题目", survey.status),
        ))
    })
}

fn question_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Question not found",
    ))
}

pub async fn create_question(
    service: &SurveyService,
    survey_id: i64,
    mut req: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;
    if let Some(response) = not_editable(&survey) {
        return Ok(response);
    }

    req.prompt = req.prompt.trim().to_string();
    req.options = req.options.iter().map(|o| o.trim().to_string()).collect();
    if let Err(msg) = validate_question(req.kind, &req.prompt, &req.options, req.scale) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
    }
    if req.kind == QuestionKind::Rating && req.scale.is_none() {
        req.scale = Some(DEFAULT_RATING_SCALE);
    }

    match storage.create_question(survey.id, req).await {
        Ok(question) => Ok(HttpResponse::Created().json(ApiResponse::success(
            question,
            "Question created successfully",
        ))),
        Err(e) => {
            error!("Failed to create question in survey {}: {}", survey_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create question: {e}"),
                )),
            )
        }
    }
}

/// 合并后的题目整体再校验一次
fn merged(question: &SurveyQuestion, req: &UpdateQuestionRequest) -> Result<(), String> {
    let kind = req.kind.unwrap_or(question.kind);
    let prompt = req.prompt.as_deref().unwrap_or(&question.prompt);
    // 换题型时存储层会清掉新题型不用的旧字段
    let kind_changed = req.kind.is_some_and(|k| k != question.kind);
    let options: &[String] = match &req.options {
        Some(options) => options,
        None if kind_changed && matches!(kind, QuestionKind::Rating | QuestionKind::Text) => &[],
        None => &question.options,
    };
    let scale = match req.scale {
        Some(scale) => Some(scale),
        None if kind_changed && kind != QuestionKind::Rating => None,
        None => question.scale,
    };
    validate_question(kind, prompt, options, scale)
}

pub async fn update_question(
    service: &SurveyService,
    survey_id: i64,
    question_id: i64,
    mut req: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;
    if let Some(response) = not_editable(&survey) {
        return Ok(response);
    }
    let question = match storage.get_question_by_id(question_id).await? {
        Some(q) if q.survey_id == survey.id => q,
        _ => return Ok(question_not_found()),
    };

    req.prompt = req.prompt.map(|p| p.trim().to_string());
    req.options = req
        .options
        .map(|options| options.iter().map(|o| o.trim().to_string()).collect());
    if let Err(msg) = merged(&question, &req) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
    }

    match storage.update_question(question.id, req).await {
        Ok(Some(question)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            question,
            "Question updated successfully",
        ))),
        Ok(None) => Ok(question_not_found()),
        Err(e) => {
            error!("Failed to update question {}: {}", question_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update question: {e}"),
                )),
            )
        }
    }
}

pub async fn delete_question(
    service: &SurveyService,
    survey_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;
    if let Some(response) = not_editable(&survey) {
        return Ok(response);
    }
    match storage.get_question_by_id(question_id).await? {
        Some(q) if q.survey_id == survey.id => {}
        _ => return Ok(question_not_found()),
    }

    match storage.delete_question(question_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Question deleted successfully",
        ))),
        Ok(false) => Ok(question_not_found()),
        Err(e) => {
            error!("Failed to delete question {}: {}", question_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete question: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn choice_questions_need_distinct_options() {
        assert!(
            validate_question(QuestionKind::SingleChoice, "Pace?", &opts(&["Slow", "Fast"]), None)
                .is_ok()
        );
        assert!(validate_question(QuestionKind::MultiChoice, "Pick", &opts(&["A"]), None).is_err());
        assert!(
            validate_question(QuestionKind::MultiChoice, "Pick", &opts(&["A", "A"]), None).is_err()
        );
    }

    #[test]
    fn rating_scale_is_bounded() {
        assert!(validate_question(QuestionKind::Rating, "Overall", &[], None).is_ok());
        assert!(validate_question(QuestionKind::Rating, "Overall", &[], Some(10)).is_ok());
        assert!(validate_question(QuestionKind::Rating, "Overall", &[], Some(1)).is_err());
        assert!(validate_question(QuestionKind::Rating, "Overall", &opts(&["x"]), None).is_err());
    }

    #[test]
    fn changing_kind_drops_old_scale() {
        let question = SurveyQuestion {
            id: 1,
            survey_id: 1,
            position: 1,
            kind: QuestionKind::Rating,
            prompt: "Overall".into(),
            options: vec![],
            scale: Some(5),
            required: true,
        };
        let req = UpdateQuestionRequest {
            kind: Some(QuestionKind::Text),
            ..Default::default()
        };
        assert!(merged(&question, &req).is_ok());
        assert!(validate_question(QuestionKind::Text, "", &[], None).is_err());
    }
}
