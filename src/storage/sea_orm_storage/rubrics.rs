use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{evaluation_campaigns, observations, rubrics};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    rubrics::{
        entities::Rubric,
        requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest},
        responses::RubricListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建评分量表
    pub async fn create_rubric_impl(
        &self,
        req: CreateRubricRequest,
        created_by: i64,
    ) -> Result<Rubric> {
        let now = chrono::Utc::now().timestamp();
        let definition = serde_json::to_string(&req.definition)?;

        let result = RubricActiveModel {
            framework_id: Set(req.framework_id),
            course_id: Set(req.course_id),
            title: Set(req.title),
            description: Set(req.description),
            definition: Set(definition),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建评分量表"))?;

        result.into_rubric()
    }

    pub async fn get_rubric_by_id_impl(&self, id: i64) -> Result<Option<Rubric>> {
        let result = Rubrics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询评分量表"))?;

        result.map(|m| m.into_rubric()).transpose()
    }

    /// 分页列出评分量表
    pub async fn list_rubrics_with_pagination_impl(
        &self,
        query: RubricListQuery,
    ) -> Result<RubricListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = Rubrics::find();

        if let Some(framework_id) = query.framework_id {
            select = select.filter(rubrics::Column::FrameworkId.eq(framework_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(rubrics::Column::CourseId.eq(course_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(rubrics::Column::Title.contains(&escaped));
        }

        let paginator = select
            .order_by_desc(rubrics::Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(db_err("查询量表总数"))?;
        let pages = paginator.num_pages().await.map_err(db_err("查询量表页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询量表列表"))?;

        Ok(RubricListResponse {
            items: rows
                .into_iter()
                .map(|m| m.into_rubric())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_rubric_impl(
        &self,
        id: i64,
        update: UpdateRubricRequest,
    ) -> Result<Option<Rubric>> {
        if Rubrics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询评分量表"))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = RubricActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(course_id) = update.course_id {
            model.course_id = Set(Some(course_id));
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(definition) = update.definition {
            model.definition = Set(serde_json::to_string(&definition)?);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(db_err("更新评分量表"))?;

        result.into_rubric().map(Some)
    }

    pub async fn delete_rubric_impl(&self, id: i64) -> Result<bool> {
        let result = Rubrics::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除评分量表"))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计引用量表的观察记录与评价活动
    pub async fn count_rubric_references_impl(&self, rubric_id: i64) -> Result<u64> {
        let observations = Observations::find()
            .filter(observations::Column::RubricId.eq(rubric_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计量表引用"))?;
        let campaigns = EvaluationCampaigns::find()
            .filter(evaluation_campaigns::Column::RubricId.eq(rubric_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计量表引用"))?;

        Ok(observations + campaigns)
    }

    /// 方案内定义行引用了给定 CLO 的量表
    pub async fn find_rubrics_referencing_clos_impl(
        &self,
        framework_id: i64,
        clo_ids: &[i64],
    ) -> Result<Vec<Rubric>> {
        if clo_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Rubrics::find()
            .filter(rubrics::Column::FrameworkId.eq(framework_id))
            .order_by_asc(rubrics::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询评分量表"))?;

        let mut matched = Vec::new();
        for row in rows {
            let rubric = row.into_rubric()?;
            if rubric
                .definition
                .clo_ids()
                .iter()
                .any(|id| clo_ids.contains(id))
            {
                matched.push(rubric);
            }
        }
        Ok(matched)
    }
}
