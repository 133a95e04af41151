pub mod access;
pub mod attainment;
pub mod auth;
pub mod evaluations;
pub mod frameworks;
pub mod me;
pub mod observations;
pub mod rubrics;
pub mod students;
pub mod surveys;
pub mod system;
pub mod users;

pub use access::AccessService;
pub use attainment::AttainmentService;
pub use auth::AuthService;
pub use evaluations::EvaluationService;
pub use frameworks::FrameworkService;
pub use me::MeService;
pub use observations::ObservationService;
pub use rubrics::RubricService;
pub use students::StudentService;
pub use surveys::SurveyService;
pub use system::SystemService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};

use crate::cache::ObjectCache;
use crate::errors::{AqmsError, Result};
use crate::middlewares::{RequireJWT, RequirePermission};
use crate::models::access::entities::{Permission, PermissionSet};
use crate::models::frameworks::entities::Framework;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 从 app data 取存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| AqmsError::database_config("Storage not found in app data"))
}

/// 从 app data 取缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> Result<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
        .ok_or_else(|| AqmsError::cache_connection("Cache not found in app data"))
}

/// 当前登录用户（由 RequireJWT 写入）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| AqmsError::authentication("Authentication required"))
}

/// 当前用户的有效权限：优先取 RequirePermission 放入的结果
pub(crate) async fn request_permissions(request: &HttpRequest) -> Result<PermissionSet> {
    if let Some(permissions) = RequirePermission::extract_permissions(request) {
        return Ok(permissions);
    }
    let user = current_user(request)?;
    let storage = storage_from_request(request)?;
    let cache = cache_from_request(request)?;
    let permissions = access::permissions::load_permission_set(&storage, &cache, &user).await?;
    request.extensions_mut().insert(permissions.clone());
    Ok(permissions)
}

/// 要求在任意范围持有权限
pub(crate) async fn ensure_permission(
    request: &HttpRequest,
    permission: Permission,
) -> Result<PermissionSet> {
    let permissions = request_permissions(request).await?;
    if !permissions.has_any_scope(permission) {
        return Err(AqmsError::authorization(format!(
            "Missing permission: {permission}"
        )));
    }
    Ok(permissions)
}

/// 要求对方案所属院系持有权限
pub(crate) async fn ensure_framework_permission(
    request: &HttpRequest,
    permission: Permission,
    framework: &Framework,
) -> Result<()> {
    let permissions = request_permissions(request).await?;
    if !permissions.allows(permission, framework.department_id) {
        return Err(AqmsError::authorization(format!(
            "Missing permission {permission} for framework {}",
            framework.code
        )));
    }
    Ok(())
}

/// 按 ID 载入方案，不存在时返回 404
pub(crate) async fn load_framework(storage: &Arc<dyn Storage>, id: i64) -> Result<Framework> {
    storage
        .get_framework_by_id(id)
        .await?
        .ok_or_else(|| AqmsError::not_found(format!("培养方案 {id} 不存在")))
}

/// CSV 下载响应
pub(crate) fn csv_attachment(filename: &str, data: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(data)
}

/// 把记录写成 CSV 字节
pub(crate) fn write_csv<I, R>(header: &[&str], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.into_inner()
        .map_err(|e| AqmsError::file_operation(format!("CSV 生成失败: {e}")))
}

/// 导入文件解析失败统一返回 400
pub(crate) fn import_error_response(
    error: &crate::utils::csv_import::ImportParseError,
) -> HttpResponse {
    tracing::info!("Import rejected: {}", error.message());
    HttpResponse::BadRequest().json(crate::models::ApiResponse::error_empty(
        error.error_code(),
        error.message(),
    ))
}
