//! 有效权限解析与缓存
//!
//! 缓存键 `perms:{user_id}`，角色分配或角色权限变更时失效。

use std::sync::Arc;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::access::entities::PermissionSet;
use crate::models::users::entities::User;
use crate::storage::Storage;

fn cache_key(user_id: i64) -> String {
    format!("perms:{user_id}")
}

/// 解析用户的有效权限，管理员直接放行
pub async fn load_permission_set(
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
    user: &User,
) -> Result<PermissionSet> {
    if user.is_admin() {
        return Ok(PermissionSet::admin());
    }

    let key = cache_key(user.id);
    if let CacheResult::Found(permissions) = cache.get::<PermissionSet>(&key).await {
        return Ok(permissions);
    }

    let permissions = PermissionSet {
        is_admin: false,
        grants: storage.list_user_permissions(user.id).await?,
    };
    cache
        .insert(key, &permissions, AppConfig::get().cache.default_ttl)
        .await;

    Ok(permissions)
}

pub async fn invalidate_permissions(cache: &Arc<dyn ObjectCache>, user_ids: &[i64]) {
    for user_id in user_ids {
        cache.remove(&cache_key(*user_id)).await;
    }
}
