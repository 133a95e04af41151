use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

pub async fn list_permissions(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_permissions(&request).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .route("/health", web::get().to(health))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/permissions", web::get().to(list_permissions)),
            ),
    );
}
