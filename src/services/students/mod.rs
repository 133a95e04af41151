pub mod create;
pub mod delete;
pub mod get;
pub mod import;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::Framework;
use crate::models::students::entities::Student;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 载入学生及其方案，并按方案院系校验权限
    pub(crate) async fn load_scoped(
        &self,
        request: &HttpRequest,
        student_id: i64,
        permission: Permission,
    ) -> Result<(Arc<dyn Storage>, Student, Framework)> {
        let storage = self.get_storage(request)?;
        let student = storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| AqmsError::not_found(format!("学生 {student_id} 不存在")))?;
        let framework = super::load_framework(&storage, student.framework_id).await?;
        super::ensure_framework_permission(request, permission, &framework).await?;
        Ok((storage, student, framework))
    }

    pub async fn list_students(
        &self,
        framework_id: i64,
        query: StudentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, framework_id, query, request).await
    }

    pub async fn create_student(
        &self,
        framework_id: i64,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, framework_id, req, request).await
    }

    pub async fn import_students(
        &self,
        framework_id: i64,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_students(self, framework_id, payload, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_student(self, id, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        req: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, id, req, request).await
    }

    pub async fn delete_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_student(self, id, request).await
    }
}
