pub mod health;
pub mod permissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 健康检查
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::get_health(self, request).await
    }

    // 权限目录
    pub async fn list_permissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        permissions::list_permissions(self, request).await
    }
}
