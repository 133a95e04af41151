use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::access::requests::CreateRoleRequest;
use crate::models::users::entities::AccountType;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password_blocking;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 Moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(AqmsError::cache_connection(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 空库时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} user(s), skipping admin seed",
            count
        );
        return Ok(());
    }
    info!("No users found in database, creating default admin account...");

    // 优先取环境变量，否则生成一次性密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_password();
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: hash_password_blocking(password).await?,
        account_type: AccountType::Admin,
        display_name: Some("Administrator".to_string()),
    };

    let user = storage.create_user(admin_request).await?;
    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(())
}

/// 内置角色
fn default_roles() -> Vec<CreateRoleRequest> {
    vec![
        CreateRoleRequest {
            code: "program_manager".to_string(),
            name: "Program Manager".to_string(),
            description: Some("Maintains frameworks, evaluations, surveys and reports".to_string()),
            permissions: Permission::ALL
                .into_iter()
                .filter(|p| !matches!(p, Permission::UserManage | Permission::RoleManage))
                .collect(),
        },
        CreateRoleRequest {
            code: "lecturer".to_string(),
            name: "Lecturer".to_string(),
            description: Some("Scores students against rubrics and views reports".to_string()),
            permissions: vec![
                Permission::FrameworkView,
                Permission::RubricManage,
                Permission::ObservationCreate,
                Permission::ObservationView,
                Permission::ReportView,
            ],
        },
    ]
}

/// 缺失的内置角色补建，已存在的保持不动
async fn seed_roles(storage: &Arc<dyn Storage>) -> Result<()> {
    for role in default_roles() {
        if storage.get_role_by_code(&role.code).await?.is_some() {
            continue;
        }
        let created = storage.create_role(role).await?;
        info!("Seeded default role '{}'", created.code);
    }
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存与初始数据
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 数据库与 Redis 的 TLS 连接共用该 provider
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| AqmsError::database_connection("Failed to install rustls crypto provider"))?;

    crate::cache::register_builtin_object_caches();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await?;
    seed_roles(&storage).await?;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roles_match_permission_split() {
        let roles = default_roles();
        let manager = &roles[0];
        assert_eq!(manager.permissions.len(), Permission::ALL.len() - 2);
        assert!(!manager.permissions.contains(&Permission::UserManage));

        let lecturer = &roles[1];
        assert!(lecturer.permissions.contains(&Permission::ObservationCreate));
        assert!(!lecturer.permissions.contains(&Permission::FrameworkManage));
    }
}
