use serde::Serialize;

use super::entities::{EvaluationCampaign, EvaluationRequest, GroupRole};
use crate::models::common::{ImportRowError, PaginationInfo};
use crate::models::observations::entities::ObservationDetail;
use crate::models::rubrics::entities::Rubric;

#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub items: Vec<EvaluationCampaign>,
    pub pagination: PaginationInfo,
}

// 批量创建结果，row 为 evaluators 中的下标（从 0 开始）
#[derive(Debug, Serialize)]
pub struct BulkCreateRequestsResponse {
    pub created: Vec<EvaluationRequest>,
    pub errors: Vec<ImportRowError>,
}

// 评价人查看单个请求：附带活动与量表，供填写评分
#[derive(Debug, Serialize)]
pub struct EvaluationRequestDetail {
    pub request: EvaluationRequest,
    pub campaign: EvaluationCampaign,
    pub rubric: Rubric,
    pub student_code: String,
    pub evaluatee_name: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitEvaluationResponse {
    pub request: EvaluationRequest,
    pub observation: ObservationDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleProgress {
    pub group_role: GroupRole,
    pub total: u64,
    pub submitted: u64,
}

// 活动进度
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignProgress {
    pub campaign_id: i64,
    pub total: u64,
    pub pending: u64,
    pub submitted: u64,
    pub completion_rate: f64,
    pub by_role: Vec<RoleProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowAverage {
    pub row_key: String,
    pub label: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleResult {
    pub group_role: GroupRole,
    pub responses: usize,
    pub average_percent: f64,
    pub rows: Vec<RowAverage>,
}

// 单个被评价学生的汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluateeResult {
    pub evaluatee_id: i64,
    pub student_code: String,
    pub full_name: String,
    pub responses: usize,
    pub average_percent: f64,
    pub by_role: Vec<RoleResult>,
    pub overall_rows: Vec<RowAverage>,
}

#[derive(Debug, Serialize)]
pub struct CampaignResultsResponse {
    pub campaign: EvaluationCampaign,
    pub items: Vec<EvaluateeResult>,
}
