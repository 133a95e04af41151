use serde::{Deserialize, Serialize};

use crate::models::common::string_enum;

/// 评分题默认量程
pub const DEFAULT_RATING_SCALE: i32 = 5;

string_enum! {
    /// 问卷状态：draft -> published -> closed
    SurveyStatus {
        Draft => "draft",
        Published => "published",
        Closed => "closed",
    }
}

string_enum! {
    QuestionKind {
        SingleChoice => "single_choice",
        MultiChoice => "multi_choice",
        Rating => "rating",
        Text => "text",
    }
}

string_enum! {
    AssignmentStatus {
        Pending => "pending",
        Completed => "completed",
        Revoked => "revoked",
    }
}

// 问卷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub anonymous: bool,
    pub status: SurveyStatus,
    pub closes_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Survey {
    /// 是否接受作答
    pub fn is_open(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.status == SurveyStatus::Published && self.closes_at.is_none_or(|at| now < at)
    }
}

// 问卷题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: i64,
    pub survey_id: i64,
    pub position: i32,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub scale: Option<i32>,
    pub required: bool,
}

impl SurveyQuestion {
    pub fn rating_scale(&self) -> i32 {
        self.scale.unwrap_or(DEFAULT_RATING_SCALE)
    }
}

// 问卷邀请
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyAssignment {
    pub id: i64,
    pub survey_id: i64,
    pub token: String,
    pub invitee_email: Option<String>,
    pub invitee_user_id: Option<i64>,
    pub status: AssignmentStatus,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 作答值：评分题为数字，多选题为数组，其余为文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// 导出时的文本形式
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Text(t) => t.clone(),
            AnswerValue::Choices(c) => c.join("; "),
        }
    }
}

// 一条已保存的答案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponseRecord {
    pub id: i64,
    pub survey_id: i64,
    pub assignment_id: i64,
    pub question_id: i64,
    pub answer: AnswerValue,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_values_deserialize_by_shape() {
        let v: AnswerValue = serde_json::from_str("4").unwrap();
        assert_eq!(v, AnswerValue::Number(4.0));
        let v: AnswerValue = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(v, AnswerValue::Text("Yes".into()));
        let v: AnswerValue = serde_json::from_str("[\"A\",\"B\"]").unwrap();
        assert_eq!(v.display(), "A; B");
    }

    #[test]
    fn survey_is_open_only_while_published_and_before_close() {
        let now = chrono::Utc::now();
        let mut survey = Survey {
            id: 1,
            title: "Course feedback".into(),
            description: None,
            anonymous: true,
            status: SurveyStatus::Draft,
            closes_at: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!survey.is_open(now));
        survey.status = SurveyStatus::Published;
        assert!(survey.is_open(now));
        survey.closes_at = Some(now - chrono::Duration::hours(1));
        assert!(!survey.is_open(now));
    }
}
