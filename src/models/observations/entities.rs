use serde::{Deserialize, Serialize};

/// 观察来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// 教师直接录入
    Direct,
    /// 360° 评价提交
    Evaluation,
}

impl std::fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationSource::Direct => write!(f, "direct"),
            ObservationSource::Evaluation => write!(f, "evaluation"),
        }
    }
}

impl std::str::FromStr for ObservationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(ObservationSource::Direct),
            "evaluation" => Ok(ObservationSource::Evaluation),
            _ => Err(format!("Invalid observation source: {s}")),
        }
    }
}

/// CLO 达成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloResultStatus {
    Achieved,
    NotAchieved,
}

impl std::fmt::Display for CloResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloResultStatus::Achieved => write!(f, "achieved"),
            CloResultStatus::NotAchieved => write!(f, "not_achieved"),
        }
    }
}

impl std::str::FromStr for CloResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "achieved" => Ok(CloResultStatus::Achieved),
            "not_achieved" => Ok(CloResultStatus::NotAchieved),
            _ => Err(format!("Invalid CLO result status: {s}")),
        }
    }
}

// 观察记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: i64,
    pub student_id: i64,
    pub rubric_id: i64,
    pub observer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub source: ObservationSource,
    pub total_score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub observed_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 观察项得分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationItem {
    pub id: i64,
    pub observation_id: i64,
    pub row_key: String,
    pub clo_id: Option<i64>,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    pub comment: Option<String>,
}

// 学生 CLO 达成记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloResult {
    pub id: i64,
    pub student_id: i64,
    pub clo_id: i64,
    pub observation_id: i64,
    pub score_percent: f64,
    pub status: CloResultStatus,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// 观察详情
#[derive(Debug, Clone, Serialize)]
pub struct ObservationDetail {
    #[serde(flatten)]
    pub observation: Observation,
    pub items: Vec<ObservationItem>,
    pub clo_results: Vec<CloResult>,
}

/// 待写入的观察项
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservationItem {
    pub row_key: String,
    pub clo_id: Option<i64>,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    pub comment: Option<String>,
}

/// 待写入的 CLO 汇总结果
#[derive(Debug, Clone, PartialEq)]
pub struct NewCloResult {
    pub clo_id: i64,
    pub score_percent: f64,
    pub status: CloResultStatus,
}

/// 存储层写入参数：观察、得分项与 CLO 汇总一并落库
#[derive(Debug, Clone)]
pub struct NewObservation {
    pub student_id: i64,
    pub rubric_id: i64,
    pub observer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub source: ObservationSource,
    pub total_score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub observed_at: chrono::DateTime<chrono::Utc>,
    pub items: Vec<NewObservationItem>,
    pub clo_results: Vec<NewCloResult>,
}
