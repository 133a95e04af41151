use crate::models::access::entities::PermissionGrant;
use crate::models::users::entities::User;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

// 当前用户信息及有效权限
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub is_admin: bool,
    pub permissions: Vec<PermissionGrant>,
}
