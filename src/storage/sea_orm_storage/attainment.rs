use std::collections::HashMap;

use super::{SeaOrmStorage, db_err};
use crate::entity::prelude::*;
use crate::entity::{clo_results, clos, observations};
use crate::errors::Result;
use crate::models::{
    attainment::entities::LatestCloResult, observations::entities::CloResult,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 方案内每个 (学生, CLO) 只保留观察时间最新的一条结果
    pub async fn list_latest_clo_results_impl(
        &self,
        framework_id: i64,
    ) -> Result<Vec<LatestCloResult>> {
        let clo_ids: Vec<i64> = Clos::find()
            .select_only()
            .column(clos::Column::Id)
            .filter(clos::Column::FrameworkId.eq(framework_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err("查询方案 CLO"))?;

        if clo_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = CloResults::find()
            .inner_join(Observations)
            .filter(clo_results::Column::CloId.is_in(clo_ids))
            .order_by_asc(observations::Column::ObservedAt)
            .order_by_asc(clo_results::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询 CLO 结果"))?;

        // 按观察时间升序遍历，补录的旧观察不会覆盖较新的结果
        let mut latest: HashMap<(i64, i64), clo_results::Model> = HashMap::new();
        for row in rows {
            latest.insert((row.student_id, row.clo_id), row);
        }

        let mut results: Vec<LatestCloResult> =
            latest.into_values().map(|m| m.into_latest()).collect();
        results.sort_by_key(|r| (r.student_id, r.clo_id));
        Ok(results)
    }

    pub async fn list_student_clo_results_impl(&self, student_id: i64) -> Result<Vec<CloResult>> {
        let rows = CloResults::find()
            .inner_join(Observations)
            .filter(clo_results::Column::StudentId.eq(student_id))
            .order_by_desc(observations::Column::ObservedAt)
            .order_by_desc(clo_results::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询学生 CLO 结果"))?;

        Ok(rows.into_iter().map(|m| m.into_clo_result()).collect())
    }
}
