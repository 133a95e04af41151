pub mod answers;
pub mod assignments;
pub mod public;
pub mod questions;
pub mod report;
pub mod results;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::surveys::entities::Survey;
use crate::models::surveys::requests::{
    CreateAssignmentsRequest, CreateQuestionRequest, CreateSurveyRequest, SubmitSurveyRequest,
    SurveyListQuery, UpdateQuestionRequest, UpdateSurveyRequest,
};
use crate::storage::Storage;

pub struct SurveyService {
    storage: Option<Arc<dyn Storage>>,
}

impl SurveyService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 校验 survey.manage 并载入问卷
    pub(crate) async fn load_survey(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> Result<(Arc<dyn Storage>, Survey)> {
        super::ensure_permission(request, Permission::SurveyManage).await?;
        let storage = self.get_storage(request)?;
        let survey = storage
            .get_survey_by_id(survey_id)
            .await?
            .ok_or_else(|| AqmsError::not_found(format!("问卷 {survey_id} 不存在")))?;
        Ok((storage, survey))
    }

    // 问卷
    pub async fn list_surveys(
        &self,
        query: SurveyListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_surveys(self, query, request).await
    }

    pub async fn create_survey(
        &self,
        req: CreateSurveyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_survey(self, req, request).await
    }

    pub async fn get_survey(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_survey(self, id, request).await
    }

    pub async fn update_survey(
        &self,
        id: i64,
        req: UpdateSurveyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_survey(self, id, req, request).await
    }

    pub async fn delete_survey(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_survey(self, id, request).await
    }

    // 题目
    pub async fn create_question(
        &self,
        survey_id: i64,
        req: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::create_question(self, survey_id, req, request).await
    }

    pub async fn update_question(
        &self,
        survey_id: i64,
        question_id: i64,
        req: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::update_question(self, survey_id, question_id, req, request).await
    }

    pub async fn delete_question(
        &self,
        survey_id: i64,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::delete_question(self, survey_id, question_id, request).await
    }

    // 邀请
    pub async fn create_assignments(
        &self,
        survey_id: i64,
        req: CreateAssignmentsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::create_assignments(self, survey_id, req, request).await
    }

    pub async fn list_assignments(
        &self,
        survey_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::list_assignments(self, survey_id, request).await
    }

    pub async fn revoke_assignment(
        &self,
        survey_id: i64,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::revoke_assignment(self, survey_id, assignment_id, request).await
    }

    // 公开作答
    pub async fn get_public_survey(
        &self,
        token: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        public::get_public_survey(self, token, request).await
    }

    pub async fn submit_public_responses(
        &self,
        token: String,
        req: SubmitSurveyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        public::submit_responses(self, token, req, request).await
    }

    // 统计
    pub async fn results(&self, survey_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        report::results(self, survey_id, request).await
    }

    pub async fn export_responses(
        &self,
        survey_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::export_responses(self, survey_id, request).await
    }
}
