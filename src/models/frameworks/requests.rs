use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameworkListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFrameworkRequest {
    pub code: String,
    pub name: String,
    pub major: String,
    pub cohort: String,
    pub academic_year: String,
    pub description: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFrameworkRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub major: Option<String>,
    pub cohort: Option<String>,
    pub academic_year: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub credits: i32,
    pub semester: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<i32>,
    pub semester: Option<i32>,
}

/// 新建学习成果，CLO 必须指定 course_id
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOutcomeRequest {
    pub code: String,
    pub description: String,
    pub course_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOutcomeRequest {
    pub code: Option<String>,
    pub description: Option<String>,
    pub course_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkRequest {
    pub source_id: i64,
    pub target_id: i64,
    pub level: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLinkRequest {
    pub level: i32,
}
