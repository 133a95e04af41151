pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::Framework;
use crate::models::rubrics::entities::Rubric;
use crate::models::rubrics::requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest};
use crate::storage::Storage;

pub struct RubricService {
    storage: Option<Arc<dyn Storage>>,
}

impl RubricService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 载入量表并按所属方案的院系校验 rubric.manage
    pub(crate) async fn load_scoped(
        &self,
        request: &HttpRequest,
        rubric_id: i64,
    ) -> Result<(Arc<dyn Storage>, Rubric, Framework)> {
        let storage = self.get_storage(request)?;
        let rubric = storage
            .get_rubric_by_id(rubric_id)
            .await?
            .ok_or_else(|| AqmsError::not_found(format!("评分量表 {rubric_id} 不存在")))?;
        let framework = super::load_framework(&storage, rubric.framework_id).await?;
        super::ensure_framework_permission(request, Permission::RubricManage, &framework).await?;
        Ok((storage, rubric, framework))
    }

    pub async fn list_rubrics(
        &self,
        query: RubricListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_rubrics(self, query, request).await
    }

    pub async fn create_rubric(
        &self,
        req: CreateRubricRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_rubric(self, req, request).await
    }

    pub async fn get_rubric(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_rubric(self, id, request).await
    }

    pub async fn update_rubric(
        &self,
        id: i64,
        req: UpdateRubricRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_rubric(self, id, req, request).await
    }

    pub async fn delete_rubric(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_rubric(self, id, request).await
    }
}
