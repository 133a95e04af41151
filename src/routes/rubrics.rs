use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::access::entities::Permission;
use crate::models::rubrics::requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest};
use crate::services::RubricService;
use crate::utils::SafeIDI64;

static RUBRIC_SERVICE: Lazy<RubricService> = Lazy::new(RubricService::new_lazy);

pub async fn list_rubrics(
    req: HttpRequest,
    query: web::Query<RubricListQuery>,
) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE.list_rubrics(query.into_inner(), &req).await
}

pub async fn create_rubric(
    req: HttpRequest,
    body: web::Json<CreateRubricRequest>,
) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE.create_rubric(body.into_inner(), &req).await
}

pub async fn get_rubric(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE.get_rubric(id.0, &req).await
}

pub async fn update_rubric(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateRubricRequest>,
) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE
        .update_rubric(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_rubric(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RUBRIC_SERVICE.delete_rubric(id.0, &req).await
}

// 配置路由
pub fn configure_rubric_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rubrics")
            .wrap(middlewares::RequirePermission::new(Permission::RubricManage))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_rubrics))
            .route("", web::post().to(create_rubric))
            .route("/{id}", web::get().to(get_rubric))
            .route("/{id}", web::put().to(update_rubric))
            .route("/{id}", web::delete().to(delete_rubric)),
    );
}
