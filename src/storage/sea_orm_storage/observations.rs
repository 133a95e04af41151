use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{clo_results, observation_items, observations};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    observations::{
        entities::{NewObservation, ObservationDetail, ObservationItem},
        requests::ObservationListQuery,
        responses::ObservationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入观察记录、评分项与 CLO 结果，由调用方控制事务
    pub(crate) async fn insert_observation<C: ConnectionTrait>(
        conn: &C,
        new: NewObservation,
    ) -> Result<ObservationDetail> {
        let now = chrono::Utc::now().timestamp();

        let observation = ObservationActiveModel {
            student_id: Set(new.student_id),
            rubric_id: Set(new.rubric_id),
            observer_id: Set(new.observer_id),
            course_id: Set(new.course_id),
            source: Set(new.source.to_string()),
            total_score: Set(new.total_score),
            max_score: Set(new.max_score),
            comment: Set(new.comment),
            observed_at: Set(new.observed_at.timestamp()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(db_err("创建观察记录"))?;

        let mut items = Vec::with_capacity(new.items.len());
        for item in new.items {
            let saved = ObservationItemActiveModel {
                observation_id: Set(observation.id),
                row_key: Set(item.row_key),
                clo_id: Set(item.clo_id),
                score: Set(item.score),
                max_score: Set(item.max_score),
                weight: Set(item.weight),
                comment: Set(item.comment),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(db_err("写入评分项"))?;
            items.push(saved.into_item());
        }

        let mut clo_results = Vec::with_capacity(new.clo_results.len());
        for result in new.clo_results {
            let saved = CloResultActiveModel {
                student_id: Set(new.student_id),
                clo_id: Set(result.clo_id),
                observation_id: Set(observation.id),
                score_percent: Set(result.score_percent),
                status: Set(result.status.to_string()),
                recorded_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(db_err("写入 CLO 结果"))?;
            clo_results.push(saved.into_clo_result());
        }

        Ok(ObservationDetail {
            observation: observation.into_observation(),
            items,
            clo_results,
        })
    }

    /// 在一个事务内创建观察记录
    pub async fn create_observation_impl(
        &self,
        observation: NewObservation,
    ) -> Result<ObservationDetail> {
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;
        let detail = Self::insert_observation(&txn, observation).await?;
        txn.commit().await.map_err(db_err("提交事务"))?;
        Ok(detail)
    }

    pub async fn get_observation_detail_impl(&self, id: i64) -> Result<Option<ObservationDetail>> {
        let Some(observation) = Observations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询观察记录"))?
        else {
            return Ok(None);
        };

        let items = ObservationItems::find()
            .filter(observation_items::Column::ObservationId.eq(id))
            .order_by_asc(observation_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询评分项"))?;

        let results = CloResults::find()
            .filter(clo_results::Column::ObservationId.eq(id))
            .order_by_asc(clo_results::Column::CloId)
            .all(&self.db)
            .await
            .map_err(db_err("查询 CLO 结果"))?;

        Ok(Some(ObservationDetail {
            observation: observation.into_observation(),
            items: items.into_iter().map(|m| m.into_item()).collect(),
            clo_results: results.into_iter().map(|m| m.into_clo_result()).collect(),
        }))
    }

    /// 分页列出观察记录
    pub async fn list_observations_with_pagination_impl(
        &self,
        query: ObservationListQuery,
    ) -> Result<ObservationListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = Observations::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(observations::Column::StudentId.eq(student_id));
        }
        if let Some(rubric_id) = query.rubric_id {
            select = select.filter(observations::Column::RubricId.eq(rubric_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(observations::Column::CourseId.eq(course_id));
        }

        let paginator = select
            .order_by_desc(observations::Column::ObservedAt)
            .order_by_desc(observations::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询观察记录总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询观察记录页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询观察记录列表"))?;

        Ok(ObservationListResponse {
            items: rows.into_iter().map(|m| m.into_observation()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 删除观察记录（评分项、CLO 结果随外键级联删除）
    pub async fn delete_observation_impl(&self, id: i64) -> Result<bool> {
        let result = Observations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除观察记录"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_observation_items_impl(
        &self,
        observation_ids: &[i64],
    ) -> Result<Vec<ObservationItem>> {
        if observation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = ObservationItems::find()
            .filter(observation_items::Column::ObservationId.is_in(observation_ids.to_vec()))
            .order_by_asc(observation_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询评分项"))?;

        Ok(rows.into_iter().map(|m| m.into_item()).collect())
    }
}
