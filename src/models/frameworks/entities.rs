use serde::{Deserialize, Serialize};

/// 映射强度取值范围
pub const MIN_LINK_LEVEL: i32 = 1;
pub const MAX_LINK_LEVEL: i32 = 4;

// 培养方案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Framework {
    pub id: i64,
    pub department_id: Option<i64>,
    pub code: String,
    pub name: String,
    pub major: String,
    pub cohort: String,
    pub academic_year: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub framework_id: i64,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub semester: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学习成果种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Plo,
    Pi,
    Clo,
}

impl OutcomeKind {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::Plo => "PLO",
            OutcomeKind::Pi => "PI",
            OutcomeKind::Clo => "CLO",
        }
    }
}

impl std::str::FromStr for OutcomeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plo" | "plos" => Ok(OutcomeKind::Plo),
            "pi" | "pis" => Ok(OutcomeKind::Pi),
            "clo" | "clos" => Ok(OutcomeKind::Clo),
            _ => Err(format!("Invalid outcome kind: {s}")),
        }
    }
}

/// 学习成果（PLO / PI / CLO 共用结构，CLO 额外带 course_id）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub id: i64,
    pub kind: OutcomeKind,
    pub framework_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    pub code: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 映射种类，方向固定为 上位 -> 下位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    PloPi,
    PloClo,
    PiClo,
}

impl LinkKind {
    /// (source, target) 两端的成果种类
    pub fn ends(&self) -> (OutcomeKind, OutcomeKind) {
        match self {
            LinkKind::PloPi => (OutcomeKind::Plo, OutcomeKind::Pi),
            LinkKind::PloClo => (OutcomeKind::Plo, OutcomeKind::Clo),
            LinkKind::PiClo => (OutcomeKind::Pi, OutcomeKind::Clo),
        }
    }
}

impl std::str::FromStr for LinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plo-pi" | "plo_pi" => Ok(LinkKind::PloPi),
            "plo-clo" | "plo_clo" => Ok(LinkKind::PloClo),
            "pi-clo" | "pi_clo" => Ok(LinkKind::PiClo),
            _ => Err(format!("Invalid link kind: {s}")),
        }
    }
}

// 映射关系
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeLink {
    pub id: i64,
    pub kind: LinkKind,
    pub source_id: i64,
    pub target_id: i64,
    pub level: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 映射矩阵：一次返回方案下全部成果与映射
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkMappings {
    pub framework: Framework,
    pub courses: Vec<Course>,
    pub plos: Vec<Outcome>,
    pub pis: Vec<Outcome>,
    pub clos: Vec<Outcome>,
    pub plo_pi_links: Vec<OutcomeLink>,
    pub plo_clo_links: Vec<OutcomeLink>,
    pub pi_clo_links: Vec<OutcomeLink>,
}

pub fn is_valid_level(level: i32) -> bool {
    (MIN_LINK_LEVEL..=MAX_LINK_LEVEL).contains(&level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_levels_are_bounded() {
        assert!(!is_valid_level(0));
        assert!(is_valid_level(1));
        assert!(is_valid_level(4));
        assert!(!is_valid_level(5));
    }

    #[test]
    fn link_kind_from_path_segment() {
        assert_eq!("plo-pi".parse::<LinkKind>().unwrap(), LinkKind::PloPi);
        assert_eq!("pi-clo".parse::<LinkKind>().unwrap(), LinkKind::PiClo);
        assert_eq!(
            "plo-clo".parse::<LinkKind>().unwrap().ends(),
            (OutcomeKind::Plo, OutcomeKind::Clo)
        );
        assert!("clo-plo".parse::<LinkKind>().is_err());
    }
}
