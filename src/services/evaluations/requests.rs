use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::common::ImportRowError;
use crate::models::evaluations::entities::{CampaignStatus, GroupRole};
use crate::models::evaluations::requests::{
    CreateEvaluationRequestsRequest, NewEvaluationRequest, RequestListQuery,
};
use crate::models::evaluations::responses::BulkCreateRequestsResponse;
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode, ListResponse};

/// `self` 只能由被评价学生本人承担，其他角色不能评价自己
pub(crate) fn check_role_pairing(
    group_role: GroupRole,
    evaluator_id: i64,
    evaluatee_user_id: i64,
) -> Result<(), &'static str> {
    match (group_role, evaluator_id == evaluatee_user_id) {
        (GroupRole::SelfReview, false) => Err("self 评价的评价人必须是被评价学生本人"),
        (GroupRole::SelfReview, true) => Ok(()),
        (_, true) => Err("学生本人只能以 self 角色参与评价"),
        (_, false) => Ok(()),
    }
}

/// 为一个被评价学生批量指派评价人，逐条报告失败原因
pub async fn create_requests(
    service: &EvaluationService,
    campaign_id: i64,
    req: CreateEvaluationRequestsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, framework) = service.load_campaign(request, campaign_id).await?;

    if campaign.status == CampaignStatus::Closed {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CampaignNotOpen,
            "评价活动已关闭",
        )));
    }

    let evaluatee = match storage.get_student_by_id(req.evaluatee_id).await? {
        Some(student) if student.framework_id == framework.id => student,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::EvaluationRequestInvalid,
                "被评价学生不存在或不属于该培养方案",
            )));
        }
    };

    let mut created = Vec::new();
    let mut errors = Vec::new();

    for (index, assignment) in req.evaluators.iter().enumerate() {
        if let Err(msg) = check_role_pairing(
            assignment.group_role,
            assignment.evaluator_id,
            evaluatee.user_id,
        ) {
            errors.push(ImportRowError::new(index, "group_role", msg));
            continue;
        }

        match storage.get_user_by_id(assignment.evaluator_id).await? {
            Some(user) if user.status == UserStatus::Active => {}
            Some(_) => {
                errors.push(ImportRowError::new(index, "evaluator_id", "评价人账号未启用"));
                continue;
            }
            None => {
                errors.push(ImportRowError::new(index, "evaluator_id", "评价人不存在"));
                continue;
            }
        }

        if storage
            .evaluation_request_exists(
                campaign.id,
                assignment.evaluator_id,
                evaluatee.id,
                assignment.group_role,
            )
            .await?
        {
            errors.push(ImportRowError::new(index, "evaluator_id", "该评价请求已存在"));
            continue;
        }

        let new_request = NewEvaluationRequest {
            campaign_id: campaign.id,
            evaluator_id: assignment.evaluator_id,
            evaluatee_id: evaluatee.id,
            group_role: assignment.group_role,
        };
        created.push(storage.create_evaluation_request(new_request).await?);
    }

    info!(
        "Campaign {}: {} evaluation requests created for {}, {} rejected",
        campaign.id,
        created.len(),
        evaluatee.student_code,
        errors.len()
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        BulkCreateRequestsResponse { created, errors },
        "Evaluation requests processed",
    )))
}

pub async fn list_requests(
    service: &EvaluationService,
    campaign_id: i64,
    query: RequestListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;

    match storage.list_campaign_requests(campaign.id, query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Evaluation requests retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list evaluation requests: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_role_requires_the_evaluatee() {
        assert!(check_role_pairing(GroupRole::SelfReview, 5, 5).is_ok());
        assert!(check_role_pairing(GroupRole::SelfReview, 6, 5).is_err());
        assert!(check_role_pairing(GroupRole::Peer, 6, 5).is_ok());
        assert!(check_role_pairing(GroupRole::Faculty, 5, 5).is_err());
    }
}
