pub mod courses;
pub mod create;
pub mod delete;
pub mod get;
pub mod import;
pub mod links;
pub mod list;
pub mod mappings;
pub mod outcomes;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::access::entities::Permission;
use crate::models::frameworks::{
    entities::{Framework, LinkKind, OutcomeKind},
    requests::{
        CreateCourseRequest, CreateFrameworkRequest, CreateLinkRequest, CreateOutcomeRequest,
        FrameworkListQuery, UpdateCourseRequest, UpdateFrameworkRequest, UpdateLinkRequest,
        UpdateOutcomeRequest,
    },
};
use crate::storage::Storage;

pub struct FrameworkService {
    storage: Option<Arc<dyn Storage>>,
}

impl FrameworkService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 载入方案并校验院系范围内的权限
    pub(crate) async fn authorize(
        &self,
        request: &HttpRequest,
        framework_id: i64,
        permission: Permission,
    ) -> Result<(Arc<dyn Storage>, Framework)> {
        let storage = self.get_storage(request)?;
        let framework = super::load_framework(&storage, framework_id).await?;
        super::ensure_framework_permission(request, permission, &framework).await?;
        Ok((storage, framework))
    }

    // 方案
    pub async fn list_frameworks(
        &self,
        query: FrameworkListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_frameworks(self, query, request).await
    }

    pub async fn create_framework(
        &self,
        req: CreateFrameworkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_framework(self, req, request).await
    }

    pub async fn get_framework(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_framework(self, id, request).await
    }

    pub async fn update_framework(
        &self,
        id: i64,
        req: UpdateFrameworkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_framework(self, id, req, request).await
    }

    pub async fn delete_framework(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_framework(self, id, request).await
    }

    pub async fn get_mappings(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mappings::get_mappings(self, id, request).await
    }

    // 课程
    pub async fn list_courses(
        &self,
        framework_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, framework_id, request).await
    }

    pub async fn create_course(
        &self,
        framework_id: i64,
        req: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::create_course(self, framework_id, req, request).await
    }

    pub async fn update_course(
        &self,
        framework_id: i64,
        course_id: i64,
        req: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::update_course(self, framework_id, course_id, req, request).await
    }

    pub async fn delete_course(
        &self,
        framework_id: i64,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::delete_course(self, framework_id, course_id, request).await
    }

    // 学习成果
    pub async fn list_outcomes(
        &self,
        framework_id: i64,
        kind: OutcomeKind,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        outcomes::list_outcomes(self, framework_id, kind, request).await
    }

    pub async fn create_outcome(
        &self,
        framework_id: i64,
        kind: OutcomeKind,
        req: CreateOutcomeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        outcomes::create_outcome(self, framework_id, kind, req, request).await
    }

    pub async fn update_outcome(
        &self,
        framework_id: i64,
        kind: OutcomeKind,
        outcome_id: i64,
        req: UpdateOutcomeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        outcomes::update_outcome(self, framework_id, kind, outcome_id, req, request).await
    }

    pub async fn delete_outcome(
        &self,
        framework_id: i64,
        kind: OutcomeKind,
        outcome_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        outcomes::delete_outcome(self, framework_id, kind, outcome_id, request).await
    }

    pub async fn import_outcomes(
        &self,
        framework_id: i64,
        kind: OutcomeKind,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_outcomes(self, framework_id, kind, payload, request).await
    }

    // 映射
    pub async fn list_links(
        &self,
        framework_id: i64,
        kind: LinkKind,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        links::list_links(self, framework_id, kind, request).await
    }

    pub async fn create_link(
        &self,
        framework_id: i64,
        kind: LinkKind,
        req: CreateLinkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        links::create_link(self, framework_id, kind, req, request).await
    }

    pub async fn update_link(
        &self,
        framework_id: i64,
        kind: LinkKind,
        link_id: i64,
        req: UpdateLinkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        links::update_link(self, framework_id, kind, link_id, req, request).await
    }

    pub async fn delete_link(
        &self,
        framework_id: i64,
        kind: LinkKind,
        link_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        links::delete_link(self, framework_id, kind, link_id, request).await
    }
}
