use serde::{Deserialize, Serialize};

use crate::models::observations::entities::CloResultStatus;

/// 学生某个 CLO 的最新结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestCloResult {
    pub student_id: i64,
    pub clo_id: i64,
    pub score_percent: f64,
    pub status: CloResultStatus,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// 某一成果在全体学生上的达成情况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeAttainment {
    pub id: i64,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    /// 有成绩的学生数
    pub evaluated: u64,
    /// 达成的学生数
    pub achieved: u64,
    /// achieved / evaluated，无数据时为 0
    pub attainment_rate: f64,
    pub average_percent: Option<f64>,
}

/// 单个 PLO / PI 的覆盖情况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCoverage {
    pub id: i64,
    pub code: String,
    pub clo_count: u64,
    pub course_count: u64,
    pub max_level: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub plos: Vec<OutcomeCoverage>,
    pub pis: Vec<OutcomeCoverage>,
    /// 至少映射一个 CLO 的 PLO 比例
    pub plo_coverage_rate: f64,
    /// 至少映射一个 CLO 的 PI 比例
    pub pi_coverage_rate: f64,
    /// 至少映射到一个 PI 或 PLO 的 CLO 比例
    pub clo_mapped_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttainmentSummary {
    pub framework_id: i64,
    pub attainment_threshold: f64,
    pub student_count: u64,
    pub clos: Vec<OutcomeAttainment>,
    pub pis: Vec<OutcomeAttainment>,
    pub plos: Vec<OutcomeAttainment>,
    pub coverage: CoverageSummary,
}

/// 学生个人在某一成果上的得分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentOutcomeScore {
    pub id: i64,
    pub code: String,
    pub score_percent: f64,
    pub achieved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAttainment {
    pub student_id: i64,
    pub framework_id: i64,
    pub attainment_threshold: f64,
    pub clos: Vec<StudentOutcomeScore>,
    pub pis: Vec<StudentOutcomeScore>,
    pub plos: Vec<StudentOutcomeScore>,
}
