use serde::Deserialize;

use super::entities::{CampaignStatus, GroupRole, RequestStatus};
use crate::models::observations::requests::ItemScoreInput;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub framework_id: Option<i64>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    pub framework_id: i64,
    pub rubric_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<chrono::DateTime<chrono::Utc>>,
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<CampaignStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorAssignment {
    pub evaluator_id: i64,
    pub group_role: GroupRole,
}

// 批量创建评价请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvaluationRequestsRequest {
    pub evaluatee_id: i64,
    pub evaluators: Vec<EvaluatorAssignment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
    pub evaluatee_id: Option<i64>,
}

// 提交评价
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub items: Vec<ItemScoreInput>,
    pub comment: Option<String>,
}

/// 存储层新建请求参数
#[derive(Debug, Clone)]
pub struct NewEvaluationRequest {
    pub campaign_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub group_role: GroupRole,
}

// 评价人待办筛选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboxQuery {
    pub status: Option<RequestStatus>,
}
