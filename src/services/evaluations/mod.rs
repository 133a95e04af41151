pub mod campaigns;
pub mod inbox;
pub mod report;
pub mod requests;
pub mod results;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::evaluations::entities::EvaluationCampaign;
use crate::models::evaluations::requests::{
    CampaignListQuery, CreateCampaignRequest, CreateEvaluationRequestsRequest, InboxQuery,
    RequestListQuery, SubmitEvaluationRequest, UpdateCampaignRequest,
};
use crate::models::frameworks::entities::Framework;
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 载入活动并按所属方案院系校验 evaluation.manage
    pub(crate) async fn load_campaign(
        &self,
        request: &HttpRequest,
        campaign_id: i64,
    ) -> Result<(Arc<dyn Storage>, EvaluationCampaign, Framework)> {
        let storage = self.get_storage(request)?;
        let campaign = storage
            .get_campaign_by_id(campaign_id)
            .await?
            .ok_or_else(|| AqmsError::not_found(format!("评价活动 {campaign_id} 不存在")))?;
        let framework = super::load_framework(&storage, campaign.framework_id).await?;
        super::ensure_framework_permission(request, Permission::EvaluationManage, &framework)
            .await?;
        Ok((storage, campaign, framework))
    }

    // 活动
    pub async fn list_campaigns(
        &self,
        query: CampaignListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        campaigns::list_campaigns(self, query, request).await
    }

    pub async fn create_campaign(
        &self,
        req: CreateCampaignRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        campaigns::create_campaign(self, req, request).await
    }

    pub async fn get_campaign(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        campaigns::get_campaign(self, id, request).await
    }

    pub async fn update_campaign(
        &self,
        id: i64,
        req: UpdateCampaignRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        campaigns::update_campaign(self, id, req, request).await
    }

    pub async fn delete_campaign(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        campaigns::delete_campaign(self, id, request).await
    }

    // 评价请求
    pub async fn create_requests(
        &self,
        campaign_id: i64,
        req: CreateEvaluationRequestsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        requests::create_requests(self, campaign_id, req, request).await
    }

    pub async fn list_requests(
        &self,
        campaign_id: i64,
        query: RequestListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        requests::list_requests(self, campaign_id, query, request).await
    }

    // 评价人
    pub async fn my_requests(
        &self,
        query: InboxQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        inbox::my_requests(self, query, request).await
    }

    pub async fn get_request(
        &self,
        request_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        inbox::get_request(self, request_id, request).await
    }

    pub async fn submit(
        &self,
        request_id: i64,
        req: SubmitEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        inbox::submit(self, request_id, req, request).await
    }

    // 进度与结果
    pub async fn progress(
        &self,
        campaign_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::progress(self, campaign_id, request).await
    }

    pub async fn results(
        &self,
        campaign_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::results(self, campaign_id, request).await
    }

    pub async fn export_results(
        &self,
        campaign_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::export_results(self, campaign_id, request).await
    }
}
