use super::entities::User;
use crate::models::access::entities::UserRoleAssignment;
use crate::models::common::PaginationInfo;
use crate::models::students::entities::Student;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// 单个用户详情：附带角色授予，学生账号附带学籍
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: User,
    pub roles: Vec<UserRoleAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
