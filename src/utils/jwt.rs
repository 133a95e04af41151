use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // 用户 ID
    pub account_type: String, // 账号类型
    pub token_type: String,   // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
    pub jti: String, // 令牌唯一标识，同一秒内签发的令牌也互不相同
}

// Token 对
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    pub fn generate_access_token(
        user_id: i64,
        account_type: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            account_type,
            ACCESS,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn generate_refresh_token(
        user_id: i64,
        account_type: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiry = token_expiry
            .unwrap_or_else(|| chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        Self::generate_token_with_expiry(user_id, account_type, REFRESH, expiry)
    }

    pub fn generate_token_with_expiry(
        user_id: i64,
        account_type: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            account_type: account_type.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: uuid::Uuid::new_v4().simple().to_string(),
        };

        let secret = Self::get_secret();
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    pub fn generate_token_pair(
        user_id: i64,
        account_type: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, account_type)?,
            refresh_token: Self::generate_refresh_token(
                user_id,
                account_type,
                refresh_token_expiry,
            )?,
        })
    }

    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }

    // 验证 token 是否为指定类型
    fn verify_token_type(
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(token)?;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, ACCESS)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, REFRESH)
    }

    /// 构造令牌 Cookie，max_age 为 0 时即删除
    fn token_cookie(
        name: &'static str,
        value: &str,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        Cookie::build(name, value.to_string())
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_access_token_cookie(access_token: &str) -> Cookie<'static> {
        Self::token_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            actix_web::cookie::time::Duration::minutes(AppConfig::get().jwt.access_token_expiry),
        )
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, days: i64) -> Cookie<'static> {
        Self::token_cookie(
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            actix_web::cookie::time::Duration::days(days),
        )
    }

    /// 注销时用于清除的两个空 Cookie
    pub fn create_empty_token_cookies() -> [Cookie<'static>; 2] {
        let zero = actix_web::cookie::time::Duration::seconds(0);
        [
            Self::token_cookie(ACCESS_TOKEN_COOKIE, "", zero),
            Self::token_cookie(REFRESH_TOKEN_COOKIE, "", zero),
        ]
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_and_refresh_tokens_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(7, "staff", None).unwrap();

        let claims = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.account_type, "staff");

        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn tokens_issued_together_differ() {
        let a = JwtUtils::generate_access_token(1, "admin").unwrap();
        let b = JwtUtils::generate_access_token(1, "admin").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = JwtUtils::generate_access_token(1, "admin").unwrap();
        let tampered = format!("{token}x");
        assert!(JwtUtils::verify_token(&tampered).is_err());
    }
}
