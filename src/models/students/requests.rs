use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub framework_id: Option<i64>,
    pub search: Option<String>,
}

// 新建学生（同时创建学生账号）
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub student_code: String,
    pub full_name: String,
    pub email: String,
    /// 缺省为学号
    pub username: Option<String>,
    /// 缺省时随机生成并在响应中返回一次
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub framework_id: Option<i64>,
    pub student_code: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// 存储层新建学生参数，密码已哈希
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub framework_id: i64,
    pub student_code: String,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}
