use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{AppStartTime, ApiResponse, system::responses::HealthResponse};
use crate::services::storage_from_request;

/// 运行状态与数据库连通性
pub async fn get_health(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    let database = match storage_from_request(request) {
        Ok(storage) => match storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Health check database ping failed: {}", e);
                false
            }
        },
        Err(_) => false,
    };

    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        database,
    };

    tracing::debug!("Health check for {}", service.get_config().app.system_name);

    let mut builder = if database {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    Ok(builder.json(ApiResponse::success(response, "Health check completed")))
}
