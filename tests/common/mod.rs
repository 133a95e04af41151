#![allow(dead_code)]

use std::sync::Arc;

use rust_aqms::cache::ObjectCache;
use rust_aqms::cache::object_cache::moka::MokaCacheWrapper;
use rust_aqms::models::users::entities::{AccountType, User};
use rust_aqms::models::users::requests::CreateUserRequest;
use rust_aqms::storage::Storage;
use rust_aqms::storage::sea_orm_storage::SeaOrmStorage;
use rust_aqms::utils::password::hash_password;

pub const ADMIN_PASSWORD: &str = "Admin@12345";
pub const MULTIPART_BOUNDARY: &str = "----aqms-test-boundary";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub admin: User,
}

/// 每个测试独立的内存库
pub async fn setup() -> TestContext {
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect("sqlite::memory:")
            .await
            .expect("in-memory database"),
    );
    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new().expect("moka cache"));
    let admin = create_user(&storage, "admin", AccountType::Admin, ADMIN_PASSWORD).await;
    TestContext {
        storage,
        cache,
        admin,
    }
}

pub async fn create_user(
    storage: &Arc<dyn Storage>,
    username: &str,
    account_type: AccountType,
    password: &str,
) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            password: hash_password(password).expect("hash"),
            account_type,
            display_name: None,
        })
        .await
        .expect("create user")
}

pub fn bearer(user: &User) -> (String, String) {
    let pair = user.generate_token_pair(None).expect("token pair");
    (
        "Authorization".to_string(),
        format!("Bearer {}", pair.access_token),
    )
}

/// 单文件字段的 multipart 请求体
pub fn csv_multipart(csv: &str) -> (String, Vec<u8>) {
    let body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"upload.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{MULTIPART_BOUNDARY}--\r\n"
    );
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body.into_bytes(),
    )
}

/// 按应用启动时的装配方式构造测试服务
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(rust_aqms::utils::query_error_handler),
                )
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_aqms::utils::json_error_handler),
                )
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .configure(rust_aqms::routes::configure_api_routes),
        )
        .await
    };
}
