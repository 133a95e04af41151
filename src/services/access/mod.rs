pub mod assignments;
pub mod departments;
pub mod permissions;
pub mod roles;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::models::access::requests::{
    AssignRoleRequest, CreateDepartmentRequest, CreateRoleRequest, UpdateDepartmentRequest,
    UpdateRoleRequest,
};
use crate::storage::Storage;

pub struct AccessService {
    storage: Option<Arc<dyn Storage>>,
}

impl AccessService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Result<Arc<dyn ObjectCache>> {
        super::cache_from_request(request)
    }

    // 院系
    pub async fn list_departments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        departments::list_departments(self, request).await
    }

    pub async fn create_department(
        &self,
        req: CreateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        departments::create_department(self, req, request).await
    }

    pub async fn update_department(
        &self,
        id: i64,
        req: UpdateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        departments::update_department(self, id, req, request).await
    }

    pub async fn delete_department(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        departments::delete_department(self, id, request).await
    }

    // 角色
    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::list_roles(self, request).await
    }

    pub async fn get_role(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::get_role(self, id, request).await
    }

    pub async fn create_role(
        &self,
        req: CreateRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::create_role(self, req, request).await
    }

    pub async fn update_role(
        &self,
        id: i64,
        req: UpdateRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roles::update_role(self, id, req, request).await
    }

    pub async fn delete_role(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::delete_role(self, id, request).await
    }

    // 角色分配
    pub async fn list_assignments(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::list_assignments(self, user_id, request).await
    }

    pub async fn assign_role(
        &self,
        user_id: i64,
        req: AssignRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::assign_role(self, user_id, req, request).await
    }

    pub async fn revoke_role(
        &self,
        user_id: i64,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::revoke_role(self, user_id, assignment_id, request).await
    }
}
