use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserStatus;

// 学生（关联登录账号）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub framework_id: i64,
    pub student_code: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
