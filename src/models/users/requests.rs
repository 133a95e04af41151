use super::entities::{AccountType, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub account_type: Option<AccountType>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub account_type: AccountType,
    pub display_name: Option<String>,
}

// 用户更新请求
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub account_type: Option<AccountType>,
    pub status: Option<UserStatus>,
    pub display_name: Option<String>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub account_type: Option<AccountType>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 导出参数
#[derive(Debug, Deserialize)]
pub struct UserExportParams {
    pub account_type: Option<AccountType>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}
