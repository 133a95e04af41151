use serde::Serialize;

// 导入行级错误
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ImportRowError {
    pub fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// 导入结果汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResponse {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}
