use std::collections::HashMap;

use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{evaluation_campaigns, evaluation_requests, students};
use crate::errors::{AqmsError, Result};
use crate::models::{
    PaginationInfo,
    evaluations::{
        entities::{
            CampaignStatus, EvaluationCampaign, EvaluationInboxItem, EvaluationRequest, GroupRole,
            RequestStatus,
        },
        requests::{
            CampaignListQuery, CreateCampaignRequest, NewEvaluationRequest, RequestListQuery,
            UpdateCampaignRequest,
        },
        responses::CampaignListResponse,
    },
    observations::entities::{NewObservation, ObservationDetail},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建评价活动
    pub async fn create_campaign_impl(
        &self,
        req: CreateCampaignRequest,
        created_by: i64,
    ) -> Result<EvaluationCampaign> {
        let now = chrono::Utc::now().timestamp();

        let result = CampaignActiveModel {
            framework_id: Set(req.framework_id),
            rubric_id: Set(req.rubric_id),
            title: Set(req.title),
            description: Set(req.description),
            start_at: Set(req.start_at.timestamp()),
            end_at: Set(req.end_at.timestamp()),
            status: Set(req.status.unwrap_or(CampaignStatus::Draft).to_string()),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建评价活动"))?;

        Ok(result.into_campaign())
    }

    pub async fn get_campaign_by_id_impl(&self, id: i64) -> Result<Option<EvaluationCampaign>> {
        let result = EvaluationCampaigns::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询评价活动"))?;

        Ok(result.map(|m| m.into_campaign()))
    }

    pub async fn list_campaigns_with_pagination_impl(
        &self,
        query: CampaignListQuery,
    ) -> Result<CampaignListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = EvaluationCampaigns::find();
        if let Some(framework_id) = query.framework_id {
            select = select.filter(evaluation_campaigns::Column::FrameworkId.eq(framework_id));
        }
        if let Some(status) = query.status {
            select = select.filter(evaluation_campaigns::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(evaluation_campaigns::Column::StartAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询评价活动总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询评价活动页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询评价活动列表"))?;

        Ok(CampaignListResponse {
            items: rows.into_iter().map(|m| m.into_campaign()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_campaign_impl(
        &self,
        id: i64,
        update: UpdateCampaignRequest,
    ) -> Result<Option<EvaluationCampaign>> {
        if self.get_campaign_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = CampaignActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(start_at) = update.start_at {
            model.start_at = Set(start_at.timestamp());
        }
        if let Some(end_at) = update.end_at {
            model.end_at = Set(end_at.timestamp());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(db_err("更新评价活动"))?;

        Ok(Some(result.into_campaign()))
    }

    /// 删除评价活动（评价请求随外键级联删除，已产生的观察记录保留）
    pub async fn delete_campaign_impl(&self, id: i64) -> Result<bool> {
        let result = EvaluationCampaigns::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除评价活动"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_evaluation_request_impl(
        &self,
        request: NewEvaluationRequest,
    ) -> Result<EvaluationRequest> {
        let result = EvaluationRequestActiveModel {
            campaign_id: Set(request.campaign_id),
            evaluator_id: Set(request.evaluator_id),
            evaluatee_id: Set(request.evaluatee_id),
            group_role: Set(request.group_role.to_string()),
            status: Set(RequestStatus::Pending.to_string()),
            observation_id: Set(None),
            submitted_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建评价请求"))?;

        Ok(result.into_request())
    }

    pub async fn evaluation_request_exists_impl(
        &self,
        campaign_id: i64,
        evaluator_id: i64,
        evaluatee_id: i64,
        group_role: GroupRole,
    ) -> Result<bool> {
        let count = EvaluationRequests::find()
            .filter(evaluation_requests::Column::CampaignId.eq(campaign_id))
            .filter(evaluation_requests::Column::EvaluatorId.eq(evaluator_id))
            .filter(evaluation_requests::Column::EvaluateeId.eq(evaluatee_id))
            .filter(evaluation_requests::Column::GroupRole.eq(group_role.as_str()))
            .count(&self.db)
            .await
            .map_err(db_err("查询评价请求"))?;

        Ok(count > 0)
    }

    pub async fn get_evaluation_request_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<EvaluationRequest>> {
        let result = EvaluationRequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询评价请求"))?;

        Ok(result.map(|m| m.into_request()))
    }

    pub async fn list_campaign_requests_impl(
        &self,
        campaign_id: i64,
        query: RequestListQuery,
    ) -> Result<Vec<EvaluationRequest>> {
        let mut select = EvaluationRequests::find()
            .filter(evaluation_requests::Column::CampaignId.eq(campaign_id));
        if let Some(status) = query.status {
            select = select.filter(evaluation_requests::Column::Status.eq(status.as_str()));
        }
        if let Some(evaluatee_id) = query.evaluatee_id {
            select = select.filter(evaluation_requests::Column::EvaluateeId.eq(evaluatee_id));
        }

        let rows = select
            .order_by_asc(evaluation_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询评价请求列表"))?;

        Ok(rows.into_iter().map(|m| m.into_request()).collect())
    }

    /// 评价人的待办列表，附带活动与被评价学生信息
    pub async fn list_evaluator_inbox_impl(
        &self,
        evaluator_id: i64,
        status: Option<RequestStatus>,
    ) -> Result<Vec<EvaluationInboxItem>> {
        let mut select = EvaluationRequests::find()
            .filter(evaluation_requests::Column::EvaluatorId.eq(evaluator_id));
        if let Some(status) = status {
            select = select.filter(evaluation_requests::Column::Status.eq(status.as_str()));
        }
        let requests = select
            .order_by_desc(evaluation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err("查询评价待办"))?;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let campaign_ids: Vec<i64> = requests.iter().map(|r| r.campaign_id).collect();
        let campaigns: HashMap<i64, evaluation_campaigns::Model> = EvaluationCampaigns::find()
            .filter(evaluation_campaigns::Column::Id.is_in(campaign_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询评价活动"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let student_ids: Vec<i64> = requests.iter().map(|r| r.evaluatee_id).collect();
        let evaluatees: HashMap<i64, students::Model> = Students::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询被评价学生"))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut items = Vec::with_capacity(requests.len());
        for request in requests {
            let (Some(campaign), Some(student)) = (
                campaigns.get(&request.campaign_id),
                evaluatees.get(&request.evaluatee_id),
            ) else {
                continue;
            };
            items.push(EvaluationInboxItem {
                campaign_title: campaign.title.clone(),
                rubric_id: campaign.rubric_id,
                start_at: super::ts(campaign.start_at),
                end_at: super::ts(campaign.end_at),
                student_code: student.student_code.clone(),
                evaluatee_name: student.full_name.clone(),
                request: request.into_request(),
            });
        }
        Ok(items)
    }

    /// 提交评价：写入观察记录并以条件更新把请求置为 submitted
    ///
    /// 条件更新未命中（请求已被提交）时整个事务回滚，返回校验错误。
    pub async fn submit_evaluation_impl(
        &self,
        request_id: i64,
        observation: NewObservation,
    ) -> Result<(EvaluationRequest, ObservationDetail)> {
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;

        let detail = Self::insert_observation(&txn, observation).await?;

        let result = EvaluationRequests::update_many()
            .col_expr(
                evaluation_requests::Column::Status,
                Expr::value(RequestStatus::Submitted.as_str()),
            )
            .col_expr(
                evaluation_requests::Column::ObservationId,
                Expr::value(detail.observation.id),
            )
            .col_expr(
                evaluation_requests::Column::SubmittedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(evaluation_requests::Column::Id.eq(request_id))
            .filter(evaluation_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err("更新评价请求状态"))?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err("回滚事务"))?;
            return Err(AqmsError::validation("评价请求已提交，不能重复提交"));
        }

        let request = EvaluationRequests::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(db_err("查询评价请求"))?
            .ok_or_else(|| AqmsError::not_found(format!("评价请求 {request_id} 不存在")))?;

        txn.commit().await.map_err(db_err("提交事务"))?;

        Ok((request.into_request(), detail))
    }
}
