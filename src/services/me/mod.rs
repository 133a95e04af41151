//! 学生本人的只读视图

pub mod attainment;
pub mod profile;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::students::entities::Student;
use crate::storage::Storage;

pub struct MeService {
    storage: Option<Arc<dyn Storage>>,
}

impl MeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 当前登录用户对应的学生档案
    pub(crate) async fn current_student(
        &self,
        request: &HttpRequest,
    ) -> Result<(Arc<dyn Storage>, Student)> {
        let user = super::current_user(request)?;
        let storage = self.get_storage(request)?;
        let student = storage
            .get_student_by_user_id(user.id)
            .await?
            .ok_or_else(|| AqmsError::not_found("No student record for the current user"))?;
        Ok((storage, student))
    }

    pub async fn profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_profile(self, request).await
    }

    pub async fn clo_results(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attainment::get_clo_results(self, request).await
    }

    pub async fn attainment(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attainment::get_attainment(self, request).await
    }
}
