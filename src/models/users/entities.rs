use serde::{Deserialize, Serialize};

// 账号类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Admin,   // 管理员
    Staff,   // 教职工
    Student, // 学生
}

impl AccountType {
    pub const ADMIN: &'static str = "admin";
    pub const STAFF: &'static str = "staff";
    pub const STUDENT: &'static str = "student";

    pub fn admin_types() -> &'static [&'static AccountType] {
        &[&Self::Admin]
    }
    pub fn staff_types() -> &'static [&'static AccountType] {
        &[&Self::Staff, &Self::Admin]
    }
    pub fn all_types() -> &'static [&'static AccountType] {
        &[&Self::Admin, &Self::Staff, &Self::Student]
    }
}

impl<'de> Deserialize<'de> for AccountType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AccountType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的账号类型: '{s}'. 支持的类型: admin, staff, student"
            ))
        })
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Admin => write!(f, "{}", AccountType::ADMIN),
            AccountType::Staff => write!(f, "{}", AccountType::STAFF),
            AccountType::Student => write!(f, "{}", AccountType::STUDENT),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AccountType::ADMIN => Ok(AccountType::Admin),
            AccountType::STAFF => Ok(AccountType::Staff),
            AccountType::STUDENT => Ok(AccountType::Student),
            _ => Err(format!("Invalid account type: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub account_type: AccountType,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.account_type.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_round_trips_through_str() {
        for t in AccountType::all_types() {
            assert_eq!(t.to_string().parse::<AccountType>().unwrap(), **t);
        }
        assert!("teacher".parse::<AccountType>().is_err());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let now = chrono::Utc::now();
        let user = User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "secret".into(),
            account_type: AccountType::Staff,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["account_type"], "staff");
    }
}
