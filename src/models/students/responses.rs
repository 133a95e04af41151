use serde::Serialize;

use super::entities::Student;
use crate::models::common::{ImportResponse, PaginationInfo};

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

// 新建学生响应，生成的初始密码仅返回这一次
#[derive(Debug, Serialize)]
pub struct StudentCreatedResponse {
    pub student: Student,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCredential {
    pub row: usize,
    pub student_code: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StudentImportResponse {
    #[serde(flatten)]
    pub summary: ImportResponse,
    pub credentials: Vec<GeneratedCredential>,
}

// 学生本人视角的档案，年级取自所属方案
#[derive(Debug, Serialize)]
pub struct StudentProfileResponse {
    pub student: Student,
    pub framework_code: String,
    pub framework_name: String,
    pub major: String,
    pub cohort: String,
}
