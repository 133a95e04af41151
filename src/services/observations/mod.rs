pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod scoring;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::Framework;
use crate::models::observations::requests::{CreateObservationRequest, ObservationListQuery};
use crate::models::rubrics::entities::Rubric;
use crate::storage::Storage;

pub struct ObservationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ObservationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 载入量表及其方案，并校验方案院系内的权限
    pub(crate) async fn rubric_scope(
        &self,
        storage: &Arc<dyn Storage>,
        request: &HttpRequest,
        rubric_id: i64,
        permission: Permission,
    ) -> Result<(Rubric, Framework)> {
        let rubric = storage
            .get_rubric_by_id(rubric_id)
            .await?
            .ok_or_else(|| AqmsError::not_found(format!("评分量表 {rubric_id} 不存在")))?;
        let framework = super::load_framework(storage, rubric.framework_id).await?;
        super::ensure_framework_permission(request, permission, &framework).await?;
        Ok((rubric, framework))
    }

    pub async fn create_observation(
        &self,
        req: CreateObservationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_observation(self, req, request).await
    }

    pub async fn list_observations(
        &self,
        query: ObservationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_observations(self, query, request).await
    }

    pub async fn get_observation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_observation(self, id, request).await
    }

    pub async fn delete_observation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_observation(self, id, request).await
    }
}
