//! 固定窗口限流
//!
//! 计数键为 `前缀:主体:窗口序号`，主体在已认证时取用户 ID，否则取客户端 IP。
//! 用于登录、令牌刷新、公开问卷与 CSV 导入端点；超限返回 429 并附带 `Retry-After`。
//!
//! ```rust,ignore
//! web::resource("/login")
//!     .wrap(RateLimit::login())
//!     .route(web::post().to(login))
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

// 键里带窗口序号，过期时间只需覆盖最长窗口
static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.max(1),
            key_prefix: "default",
        }
    }

    pub fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.key_prefix = prefix;
        self
    }

    /// 登录：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10 次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 公开问卷：20 次/分钟/IP，限制令牌枚举
    pub fn public_survey() -> Self {
        Self::new(20, 60).with_prefix("public_survey")
    }

    /// CSV 导入：10 次/分钟/用户
    pub fn import() -> Self {
        Self::new(10, 60).with_prefix("import")
    }

    /// 当前窗口序号与窗口剩余秒数
    fn window(&self, now_secs: u64) -> (u64, u64) {
        let index = now_secs / self.window_secs;
        let reset_in = self.window_secs - now_secs % self.window_secs;
        (index, reset_in)
    }

    fn counter_key(&self, subject: &str, window_index: u64) -> String {
        format!("{}:{}:{}", self.key_prefix, subject, window_index)
    }
}

/// 连接地址优先，其次是代理转发头
fn client_ip(req: &ServiceRequest) -> String {
    let parse = |value: &str| value.trim().parse::<IpAddr>().ok();

    let peer = req.connection_info().realip_remote_addr().map(str::to_string);
    if let Some(ip) = peer.as_deref().and_then(parse) {
        return ip.to_string();
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(parse);
    let real_ip = || {
        req.headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(parse)
    };

    forwarded
        .or_else(real_ip)
        .map(|ip| ip.to_string())
        .or(peer)
        .unwrap_or_else(|| "unknown".to_string())
}

fn subject(req: &ServiceRequest) -> String {
    match req.extensions().get::<User>() {
        Some(user) => format!("user:{}", user.id),
        None => format!("ip:{}", client_ip(req)),
    }
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header((LIMIT_HEADER, limit.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window_index, reset_in) = limit.window(now);
            let key = limit.counter_key(&subject(&req), window_index);

            let count = COUNTERS
                .entry(key.clone())
                .and_upsert_with(|existing| {
                    let next = existing.map(|e| e.into_value()).unwrap_or(0) + 1;
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(limit.max_requests, reset_in).map_into_right_body(),
                ));
            }

            let mut res = srv.call(req).await?;
            let remaining = limit.max_requests - count;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static(LIMIT_HEADER),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static(REMAINING_HEADER),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[::core::prelude::v1::test]
    fn presets_use_distinct_prefixes() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");
        assert_eq!(RateLimit::public_survey().max_requests, 20);
        assert_eq!(RateLimit::import().key_prefix, "import");
        assert_eq!(RateLimit::refresh_token().key_prefix, "refresh");
    }

    #[::core::prelude::v1::test]
    fn window_index_and_reset() {
        let limit = RateLimit::new(3, 60);
        assert_eq!(limit.window(120), (2, 60));
        assert_eq!(limit.window(179), (2, 1));
        assert_eq!(limit.counter_key("ip:10.0.0.1", 2), "default:ip:10.0.0.1:2");
    }

    #[actix_web::test]
    async fn requests_over_the_limit_get_429() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(2, 3600).with_prefix("unit_test"))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;
        let peer: std::net::SocketAddr = "192.0.2.10:5000".parse().unwrap();

        for expected_remaining in ["1", "0"] {
            let req = test::TestRequest::get()
                .uri("/limited")
                .peer_addr(peer)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get(REMAINING_HEADER).unwrap(),
                expected_remaining
            );
        }

        let req = test::TestRequest::get()
            .uri("/limited")
            .peer_addr(peer)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));
    }
}
