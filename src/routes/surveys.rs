use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::access::entities::Permission;
use crate::models::surveys::requests::{
    CreateAssignmentsRequest, CreateQuestionRequest, CreateSurveyRequest, SubmitSurveyRequest,
    SurveyListQuery, UpdateQuestionRequest, UpdateSurveyRequest,
};
use crate::services::SurveyService;
use crate::utils::{SafeIDI64, SafeSurveyIdI64, SafeSurveyToken};

static SURVEY_SERVICE: Lazy<SurveyService> = Lazy::new(SurveyService::new_lazy);

// 问卷
pub async fn list_surveys(
    req: HttpRequest,
    query: web::Query<SurveyListQuery>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.list_surveys(query.into_inner(), &req).await
}

pub async fn create_survey(
    req: HttpRequest,
    body: web::Json<CreateSurveyRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.create_survey(body.into_inner(), &req).await
}

pub async fn get_survey(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.get_survey(id.0, &req).await
}

pub async fn update_survey(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSurveyRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .update_survey(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_survey(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.delete_survey(id.0, &req).await
}

// 题目
pub async fn create_question(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    body: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .create_question(survey_id.0, body.into_inner(), &req)
        .await
}

pub async fn update_question(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    id: SafeIDI64,
    body: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .update_question(survey_id.0, id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .delete_question(survey_id.0, id.0, &req)
        .await
}

// 邀请
pub async fn list_assignments(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.list_assignments(survey_id.0, &req).await
}

pub async fn create_assignments(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    body: web::Json<CreateAssignmentsRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .create_assignments(survey_id.0, body.into_inner(), &req)
        .await
}

pub async fn revoke_assignment(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .revoke_assignment(survey_id.0, id.0, &req)
        .await
}

// 统计
pub async fn results(req: HttpRequest, survey_id: SafeSurveyIdI64) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.results(survey_id.0, &req).await
}

pub async fn export_responses(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.export_responses(survey_id.0, &req).await
}

// 公开作答（免登录，凭邀请令牌）
pub async fn get_public_survey(
    req: HttpRequest,
    token: SafeSurveyToken,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.get_public_survey(token.0, &req).await
}

pub async fn submit_public_responses(
    req: HttpRequest,
    token: SafeSurveyToken,
    body: web::Json<SubmitSurveyRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .submit_public_responses(token.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_survey_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/surveys")
            .wrap(middlewares::RequirePermission::new(Permission::SurveyManage))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_surveys))
            .route("", web::post().to(create_survey))
            .route("/{id}", web::get().to(get_survey))
            .route("/{id}", web::put().to(update_survey))
            .route("/{id}", web::delete().to(delete_survey))
            .route("/{survey_id}/questions", web::post().to(create_question))
            .route(
                "/{survey_id}/questions/{id}",
                web::put().to(update_question),
            )
            .route(
                "/{survey_id}/questions/{id}",
                web::delete().to(delete_question),
            )
            .route("/{survey_id}/assignments", web::get().to(list_assignments))
            .route(
                "/{survey_id}/assignments",
                web::post().to(create_assignments),
            )
            .route(
                "/{survey_id}/assignments/{id}",
                web::delete().to(revoke_assignment),
            )
            .route("/{survey_id}/results", web::get().to(results))
            .route(
                "/{survey_id}/responses/export",
                web::get().to(export_responses),
            ),
    );
}

pub fn configure_public_survey_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/public/surveys")
            .wrap(middlewares::RateLimit::public_survey())
            .route("/{token}", web::get().to(get_public_survey))
            .route("/{token}/responses", web::post().to(submit_public_responses)),
    );
}
