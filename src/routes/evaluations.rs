use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::access::entities::Permission;
use crate::models::evaluations::requests::{
    CampaignListQuery, CreateCampaignRequest, CreateEvaluationRequestsRequest, InboxQuery,
    RequestListQuery, SubmitEvaluationRequest, UpdateCampaignRequest,
};
use crate::services::EvaluationService;
use crate::utils::{SafeCampaignIdI64, SafeIDI64};

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 评价活动
pub async fn list_campaigns(
    req: HttpRequest,
    query: web::Query<CampaignListQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_campaigns(query.into_inner(), &req)
        .await
}

pub async fn create_campaign(
    req: HttpRequest,
    body: web::Json<CreateCampaignRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_campaign(body.into_inner(), &req)
        .await
}

pub async fn get_campaign(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_campaign(id.0, &req).await
}

pub async fn update_campaign(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateCampaignRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .update_campaign(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_campaign(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.delete_campaign(id.0, &req).await
}

pub async fn create_requests(
    req: HttpRequest,
    campaign_id: SafeCampaignIdI64,
    body: web::Json<CreateEvaluationRequestsRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_requests(campaign_id.0, body.into_inner(), &req)
        .await
}

pub async fn list_requests(
    req: HttpRequest,
    campaign_id: SafeCampaignIdI64,
    query: web::Query<RequestListQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_requests(campaign_id.0, query.into_inner(), &req)
        .await
}

pub async fn progress(
    req: HttpRequest,
    campaign_id: SafeCampaignIdI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.progress(campaign_id.0, &req).await
}

pub async fn results(
    req: HttpRequest,
    campaign_id: SafeCampaignIdI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.results(campaign_id.0, &req).await
}

pub async fn export_results(
    req: HttpRequest,
    campaign_id: SafeCampaignIdI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.export_results(campaign_id.0, &req).await
}

// 评价人
pub async fn my_requests(
    req: HttpRequest,
    query: web::Query<InboxQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.my_requests(query.into_inner(), &req).await
}

pub async fn get_request(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_request(id.0, &req).await
}

pub async fn submit(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .submit(id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            // 评价人可以是学生，只要求登录
            .service(
                web::scope("/requests")
                    .route("/mine", web::get().to(my_requests))
                    .route("/{id}", web::get().to(get_request))
                    .route("/{id}/submit", web::post().to(submit)),
            )
            .service(
                web::scope("/campaigns")
                    .wrap(middlewares::RequirePermission::new(
                        Permission::EvaluationManage,
                    ))
                    .route("", web::get().to(list_campaigns))
                    .route("", web::post().to(create_campaign))
                    .route("/{id}", web::get().to(get_campaign))
                    .route("/{id}", web::put().to(update_campaign))
                    .route("/{id}", web::delete().to(delete_campaign))
                    .route("/{campaign_id}/requests", web::get().to(list_requests))
                    .route("/{campaign_id}/requests", web::post().to(create_requests))
                    .route("/{campaign_id}/progress", web::get().to(progress))
                    .route("/{campaign_id}/results", web::get().to(results))
                    .route(
                        "/{campaign_id}/results/export",
                        web::get().to(export_results),
                    ),
            ),
    );
}
