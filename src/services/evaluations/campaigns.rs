use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::EvaluationService;
use crate::models::access::entities::Permission;
use crate::models::evaluations::requests::{
    CampaignListQuery, CreateCampaignRequest, UpdateCampaignRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::moderation;
use crate::utils::validate::validate_required_text;

fn validate_window(
    start_at: chrono::DateTime<chrono::Utc>,
    end_at: chrono::DateTime<chrono::Utc>,
) -> Result<(), &'static str> {
    if start_at >= end_at {
        return Err("start_at 必须早于 end_at");
    }
    Ok(())
}

pub async fn list_campaigns(
    service: &EvaluationService,
    query: CampaignListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match query.framework_id {
        Some(framework_id) => {
            let framework = crate::services::load_framework(&storage, framework_id).await?;
            crate::services::ensure_framework_permission(
                request,
                Permission::EvaluationManage,
                &framework,
            )
            .await?;
        }
        None => {
            let permissions = crate::services::request_permissions(request).await?;
            if !permissions.allows(Permission::EvaluationManage, None) {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "framework_id is required",
                )));
            }
        }
    }

    match storage.list_campaigns_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Campaigns retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list campaigns: {e}"),
            )),
        ),
    }
}

pub async fn create_campaign(
    service: &EvaluationService,
    mut req: CreateCampaignRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, req.framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::EvaluationManage, &framework)
        .await?;
    let user = crate::services::current_user(request)?;

    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_required_text(&req.title, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CampaignInvalid, msg)));
    }
    if let Err(msg) = validate_window(req.start_at, req.end_at) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CampaignInvalid, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    match storage.get_rubric_by_id(req.rubric_id).await? {
        Some(rubric) if rubric.framework_id == framework.id => {}
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CampaignInvalid,
                "量表不存在或不属于该培养方案",
            )));
        }
    }

    match storage.create_campaign(req, user.id).await {
        Ok(campaign) => {
            info!(
                "Campaign {} created in framework {}",
                campaign.id, framework.code
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                campaign,
                "Campaign created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create campaign: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create campaign: {e}"),
                )),
            )
        }
    }
}

pub async fn get_campaign(
    service: &EvaluationService,
    campaign_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (_, campaign, _) = service.load_campaign(request, campaign_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        campaign,
        "Campaign retrieved successfully",
    )))
}

pub async fn update_campaign(
    service: &EvaluationService,
    campaign_id: i64,
    mut req: UpdateCampaignRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;

    if let Some(title) = req.title.take() {
        let title = title.trim().to_string();
        if let Err(msg) = validate_required_text(&title, 200) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::CampaignInvalid, msg)));
        }
        req.title = Some(title);
    }
    let start_at = req.start_at.unwrap_or(campaign.start_at);
    let end_at = req.end_at.unwrap_or(campaign.end_at);
    if let Err(msg) = validate_window(start_at, end_at) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CampaignInvalid, msg)));
    }
    moderation::check_optional("description", req.description.as_deref())?;

    match storage.update_campaign(campaign_id, req).await {
        Ok(Some(campaign)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            campaign,
            "Campaign updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CampaignNotFound,
            "Campaign not found",
        ))),
        Err(e) => {
            error!("Failed to update campaign {}: {}", campaign_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update campaign: {e}"),
                )),
            )
        }
    }
}

/// 删除活动，请求随外键级联删除，已产生的观察记录保留
pub async fn delete_campaign(
    service: &EvaluationService,
    campaign_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;

    match storage.delete_campaign(campaign.id).await {
        Ok(_) => {
            info!("Campaign {} deleted", campaign.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Campaign deleted successfully",
            )))
        }
        Err(e) => {
            error!("Failed to delete campaign {}: {}", campaign_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to delete campaign: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn window_must_be_ordered() {
        let now = Utc::now();
        assert!(validate_window(now, now + Duration::hours(1)).is_ok());
        assert!(validate_window(now, now).is_err());
        assert!(validate_window(now + Duration::hours(1), now).is_err());
    }
}
