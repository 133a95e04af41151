use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::extract_access_token;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 处理用户登出
///
/// 清除缓存中的会话并下发两个过期 Cookie。
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(token) = extract_access_token(request) {
        let cache = service.get_cache(request)?;
        cache.remove(&format!("user:{token}")).await;
    }

    let [access, refresh] = JwtUtils::create_empty_token_cookies();

    Ok(HttpResponse::Ok()
        .cookie(access)
        .cookie(refresh)
        .json(ApiResponse::<()>::success_empty("登出成功")))
}
