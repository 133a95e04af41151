use crate::config::AppConfig;
use crate::errors::AqmsError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn argon2_instance() -> Result<Argon2<'static>, AqmsError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| AqmsError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, AqmsError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_instance()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AqmsError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 在阻塞线程池中哈希，避免占用异步工作线程
pub async fn hash_password_blocking(password: String) -> Result<String, AqmsError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AqmsError::validation(format!("密码处理失败: {e}")))?
}

/// 验证密码（参数从哈希串中读取）
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("Clinical2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Clinical2024", &hash));
        assert!(!verify_password("clinical2024", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
