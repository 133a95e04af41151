use serde::{Deserialize, Serialize};

use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    // 错误响应携带错误详情
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

// 不分页的列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_carries_error_field() {
        let resp = ApiResponse::error_empty(ErrorCode::BadRequest, "bad level");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 400);
        assert_eq!(json["error"], "bad level");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn success_envelope_omits_error_field() {
        let resp = ApiResponse::success(vec![1, 2], "ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert!(json.get("error").is_none());
        assert_eq!(json["data"][1], 2);
    }
}
