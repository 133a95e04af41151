use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use super::EvaluationService;
use super::results::{campaign_progress, campaign_results, export_header, export_rows};
use crate::errors::{AqmsError, Result};
use crate::models::evaluations::entities::{EvaluationCampaign, RequestStatus};
use crate::models::evaluations::requests::RequestListQuery;
use crate::models::evaluations::responses::{CampaignResultsResponse, EvaluateeResult};
use crate::models::rubrics::entities::Rubric;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{csv_attachment, write_csv};
use crate::storage::Storage;

pub async fn progress(
    service: &EvaluationService,
    campaign_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;

    match storage
        .list_campaign_requests(campaign.id, RequestListQuery::default())
        .await
    {
        Ok(requests) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            campaign_progress(campaign.id, &requests),
            "Campaign progress retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load campaign progress: {e}"),
            )),
        ),
    }
}

/// 载入汇总所需数据并计算结果
async fn compute(
    storage: &Arc<dyn Storage>,
    campaign: &EvaluationCampaign,
) -> Result<(Rubric, Vec<EvaluateeResult>)> {
    let rubric = storage
        .get_rubric_by_id(campaign.rubric_id)
        .await?
        .ok_or_else(|| AqmsError::not_found("Rubric not found"))?;
    let requests = storage
        .list_campaign_requests(campaign.id, RequestListQuery::default())
        .await?;

    let observation_ids: Vec<i64> = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Submitted)
        .filter_map(|r| r.observation_id)
        .collect();
    let items = storage.list_observation_items(&observation_ids).await?;

    let mut students = HashMap::new();
    for request in &requests {
        if students.contains_key(&request.evaluatee_id) {
            continue;
        }
        if let Some(student) = storage.get_student_by_id(request.evaluatee_id).await? {
            students.insert(student.id, student);
        }
    }

    let results = campaign_results(&rubric.definition, &requests, &items, &students);
    Ok((rubric, results))
}

pub async fn results(
    service: &EvaluationService,
    campaign_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;
    let (_, items) = compute(&storage, &campaign).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CampaignResultsResponse { campaign, items },
        "Campaign results retrieved successfully",
    )))
}

pub async fn export_results(
    service: &EvaluationService,
    campaign_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, campaign, _) = service.load_campaign(request, campaign_id).await?;
    let (rubric, results) = compute(&storage, &campaign).await?;

    let header = export_header(&rubric.definition);
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let data = write_csv(&header, export_rows(&rubric.definition, &results))?;

    Ok(csv_attachment(
        &format!("campaign_{}_results.csv", campaign.id),
        data,
    ))
}
