//! 用户导出服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::UserService;
use crate::models::users::entities::User;
use crate::models::users::requests::{UserExportParams, UserListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{csv_attachment, write_csv};

// 最多导出 10000 条
const EXPORT_PAGE_SIZE: i64 = 100;
const EXPORT_MAX_PAGES: i64 = 100;

/// 导出用户列表
pub async fn export_users(
    service: &UserService,
    params: UserExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut users: Vec<User> = Vec::new();
    let mut page = 1;
    loop {
        let query = UserListQuery {
            page: Some(page),
            size: Some(EXPORT_PAGE_SIZE),
            account_type: params.account_type,
            status: params.status,
            search: params.search.clone(),
        };
        let response = match storage.list_users_with_pagination(query).await {
            Ok(response) => response,
            Err(e) => {
                error!("导出用户失败: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("导出用户失败: {e}"),
                    )),
                );
            }
        };
        users.extend(response.items);
        if page >= response.pagination.total_pages || page >= EXPORT_MAX_PAGES {
            break;
        }
        page += 1;
    }

    let data = write_csv(
        &[
            "id",
            "username",
            "email",
            "account_type",
            "status",
            "display_name",
            "created_at",
        ],
        users.iter().map(|user| {
            [
                user.id.to_string(),
                user.username.clone(),
                user.email.clone(),
                user.account_type.to_string(),
                user.status.to_string(),
                user.display_name.clone().unwrap_or_default(),
                user.created_at.to_rfc3339(),
            ]
        }),
    )?;

    Ok(csv_attachment("users.csv", data))
}
