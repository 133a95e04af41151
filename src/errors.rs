//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称以及对应的 HTTP 状态码。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_aqms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AqmsError {
            $($variant(String),)*
        }

        impl AqmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AqmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AqmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AqmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AqmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AqmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_aqms_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Import("E010", "Import Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict Error"),
    Moderation("E015", "Content Moderation Error"),
}

impl AqmsError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            AqmsError::Validation(_) | AqmsError::DateParse(_) => ErrorCode::BadRequest,
            AqmsError::Import(_) => ErrorCode::ImportFileDataInvalid,
            AqmsError::Moderation(_) => ErrorCode::ContentRejected,
            AqmsError::Conflict(_) => ErrorCode::Conflict,
            AqmsError::NotFound(_) => ErrorCode::NotFound,
            AqmsError::Authentication(_) => ErrorCode::Unauthorized,
            AqmsError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for AqmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AqmsError {}

// 业务错误直接映射为 HTTP 响应，服务层可以用 `?` 传播
impl ResponseError for AqmsError {
    fn status_code(&self) -> StatusCode {
        match self {
            AqmsError::Validation(_)
            | AqmsError::DateParse(_)
            | AqmsError::Import(_)
            | AqmsError::Moderation(_)
            | AqmsError::Conflict(_) => StatusCode::BAD_REQUEST,
            AqmsError::NotFound(_) => StatusCode::NOT_FOUND,
            AqmsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AqmsError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AqmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        AqmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AqmsError {
    fn from(err: std::io::Error) -> Self {
        AqmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AqmsError {
    fn from(err: serde_json::Error) -> Self {
        AqmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AqmsError {
    fn from(err: chrono::ParseError) -> Self {
        AqmsError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for AqmsError {
    fn from(err: csv::Error) -> Self {
        AqmsError::Import(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AqmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AqmsError::cache_connection("test").code(), "E001");
        assert_eq!(AqmsError::database_config("test").code(), "E003");
        assert_eq!(AqmsError::validation("test").code(), "E007");
        assert_eq!(AqmsError::authentication("test").code(), "E012");
        assert_eq!(AqmsError::moderation("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AqmsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(AqmsError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_error_message() {
        let err = AqmsError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = AqmsError::validation("Invalid level");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid level"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AqmsError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AqmsError::import("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AqmsError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AqmsError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AqmsError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AqmsError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
