use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::{error, info};

use super::SurveyService;
use crate::models::surveys::entities::SurveyStatus;
use crate::models::surveys::requests::{CreateAssignmentsRequest, NewSurveyAssignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_email;

const MAX_INVITES_PER_REQUEST: usize = 1000;

fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 规范化邮箱列表：去空白、转小写、去重，遇到非法邮箱立即报错
fn normalize_emails(emails: &[String]) -> Result<Vec<String>, String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for email in emails {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            continue;
        }
        validate_email(&email).map_err(|msg| format!("{email}: {msg}"))?;
        if seen.insert(email.clone()) {
            result.push(email);
        }
    }
    Ok(result)
}

pub async fn create_assignments(
    service: &SurveyService,
    survey_id: i64,
    req: CreateAssignmentsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    if survey.status == SurveyStatus::Closed {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotAvailable,
            "问卷已关闭，不能再发出邀请",
        )));
    }

    let emails = match normalize_emails(&req.emails) {
        Ok(emails) => emails,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SurveyInvalid, msg)));
        }
    };

    let mut invites: Vec<NewSurveyAssignment> = emails
        .into_iter()
        .map(|email| NewSurveyAssignment {
            token: new_token(),
            invitee_email: Some(email),
            invitee_user_id: None,
        })
        .collect();

    let mut seen_users = HashSet::new();
    for user_id in req.user_ids {
        if !seen_users.insert(user_id) {
            continue;
        }
        let Some(user) = storage.get_user_by_id(user_id).await? else {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                format!("用户 {user_id} 不存在"),
            )));
        };
        invites.push(NewSurveyAssignment {
            token: new_token(),
            invitee_email: Some(user.email),
            invitee_user_id: Some(user.id),
        });
    }

    if invites.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SurveyInvalid,
            "emails 与 user_ids 不能同时为空",
        )));
    }
    if invites.len() > MAX_INVITES_PER_REQUEST {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SurveyInvalid,
            format!("单次最多邀请 {MAX_INVITES_PER_REQUEST} 人"),
        )));
    }

    match storage.create_survey_assignments(survey.id, invites).await {
        Ok(created) => {
            info!("Survey {}: {} invitations created", survey.id, created.len());
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Survey assignments created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create assignments for survey {}: {}", survey_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create survey assignments: {e}"),
                )),
            )
        }
    }
}

pub async fn list_assignments(
    service: &SurveyService,
    survey_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    match storage.list_survey_assignments(survey.id).await {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignments,
            "Survey assignments retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list survey assignments: {e}"),
            )),
        ),
    }
}

/// 仅撤销 pending 邀请
pub async fn revoke_assignment(
    service: &SurveyService,
    survey_id: i64,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    match storage
        .revoke_survey_assignment(survey.id, assignment_id)
        .await
    {
        Ok(true) => {
            info!("Survey {}: assignment {} revoked", survey.id, assignment_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Survey assignment revoked successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyAssignmentNotFound,
            "Pending survey assignment not found",
        ))),
        Err(e) => {
            error!("Failed to revoke assignment {}: {}", assignment_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to revoke survey assignment: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_lowercased_and_deduplicated() {
        let emails = vec![
            " Alice@Example.com ".to_string(),
            "alice@example.com".to_string(),
            String::new(),
            "bob@example.com".to_string(),
        ];
        assert_eq!(
            normalize_emails(&emails).unwrap(),
            vec!["alice@example.com", "bob@example.com"]
        );
        assert!(normalize_emails(&["not-an-email".to_string()]).is_err());
    }

    #[test]
    fn tokens_are_unique_hex() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
