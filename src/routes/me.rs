use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::AccountType;
use crate::services::MeService;

static ME_SERVICE: Lazy<MeService> = Lazy::new(MeService::new_lazy);

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    ME_SERVICE.profile(&req).await
}

pub async fn get_clo_results(req: HttpRequest) -> ActixResult<HttpResponse> {
    ME_SERVICE.clo_results(&req).await
}

pub async fn get_attainment(req: HttpRequest) -> ActixResult<HttpResponse> {
    ME_SERVICE.attainment(&req).await
}

// 配置路由
pub fn configure_me_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(middlewares::RequireRole::new(AccountType::Student))
            .wrap(middlewares::RequireJWT)
            .route("/student", web::get().to(get_profile))
            .route("/clo-results", web::get().to(get_clo_results))
            .route("/attainment", web::get().to(get_attainment)),
    );
}
