use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// 常用部署变量到配置键的映射，优先级高于 `AQMS_` 前缀变量
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("jwt.secret", "JWT_SECRET"),
    ("database.url", "DATABASE_URL"),
    ("cache.redis.url", "REDIS_URL"),
    ("cache.redis.key_prefix", "REDIS_KEY_PREFIX"),
    ("assessment.attainment_threshold", "ATTAINMENT_THRESHOLD"),
    ("moderation.enabled", "MODERATION_ENABLED"),
];

impl AppConfig {
    /// 依次合并 config.toml、config.{APP_ENV}.toml 与环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env_name}")).required(false))
            .add_source(
                Environment::with_prefix("AQMS")
                    .separator("_")
                    .try_parsing(true),
            );
        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }
        app_config.validate()?;
        Ok(app_config)
    }

    /// 业务相关的取值范围检查
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percent = |name: &str, value: f64| {
            if (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Message(format!(
                    "{name} must be between 0 and 100, got {value}"
                )))
            }
        };
        percent(
            "assessment.attainment_threshold",
            self.assessment.attainment_threshold,
        )?;
        percent(
            "assessment.default_pass_threshold",
            self.assessment.default_pass_threshold,
        )?;

        if self.import.max_rows == 0 || self.import.max_file_size == 0 {
            return Err(ConfigError::Message(
                "import.max_rows and import.max_file_size must be positive".to_string(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt token expiry must be positive".to_string(),
            ));
        }
        if self.is_production() && self.jwt.secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be changed in production".to_string(),
            ));
        }
        Ok(())
    }

    /// 全局配置；未显式初始化时按默认来源加载
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        Config::builder()
            .add_source(File::with_name("config"))
            .build()
            .and_then(|c| c.try_deserialize::<AppConfig>())
            .unwrap()
    }

    #[test]
    fn bundled_config_is_valid() {
        let config = base();
        assert!(config.validate().is_ok());
        assert_eq!(config.assessment.attainment_threshold, 60.0);
    }

    #[test]
    fn thresholds_outside_percent_range_are_rejected() {
        let mut config = base();
        config.assessment.attainment_threshold = 120.0;
        assert!(config.validate().is_err());

        let mut config = base();
        config.assessment.default_pass_threshold = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_requires_a_real_jwt_secret() {
        let mut config = base();
        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-long-random-secret".to_string();
        assert!(config.validate().is_ok());
    }
}
