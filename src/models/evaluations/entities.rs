use serde::{Deserialize, Serialize};

use crate::models::common::string_enum;

string_enum! {
    /// 评价活动状态
    CampaignStatus {
        Draft => "draft",
        Open => "open",
        Closed => "closed",
    }
}

string_enum! {
    /// 评价人角色
    GroupRole {
        SelfReview => "self",
        Peer => "peer",
        Faculty => "faculty",
        Supervisor => "supervisor",
        Patient => "patient",
    }
}

string_enum! {
    /// 评价请求状态，只能 pending -> submitted
    RequestStatus {
        Pending => "pending",
        Submitted => "submitted",
    }
}

// 360° 评价活动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCampaign {
    pub id: i64,
    pub framework_id: i64,
    pub rubric_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub status: CampaignStatus,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl EvaluationCampaign {
    /// 是否接受提交
    pub fn accepts_submissions(&self, now: chrono::DateTime<chrono::Utc>) -> Result<(), String> {
        if self.status != CampaignStatus::Open {
            return Err(format!("评价活动未开放（当前状态: {}）", self.status));
        }
        if now < self.start_at {
            return Err("评价活动尚未开始".to_string());
        }
        if now > self.end_at {
            return Err("评价活动已结束".to_string());
        }
        Ok(())
    }
}

// 评价请求：评价人 -> 被评价学生
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub id: i64,
    pub campaign_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub group_role: GroupRole,
    pub status: RequestStatus,
    pub observation_id: Option<i64>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 评价人待办列表中的条目
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationInboxItem {
    #[serde(flatten)]
    pub request: EvaluationRequest,
    pub campaign_title: String,
    pub rubric_id: i64,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub student_code: String,
    pub evaluatee_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn campaign(status: CampaignStatus) -> EvaluationCampaign {
        let now = Utc::now();
        EvaluationCampaign {
            id: 1,
            framework_id: 1,
            rubric_id: 1,
            title: "Clinical rotation".into(),
            description: None,
            start_at: now - Duration::days(1),
            end_at: now + Duration::days(1),
            status,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_open_campaigns_inside_window_accept_submissions() {
        let now = Utc::now();
        assert!(campaign(CampaignStatus::Open).accepts_submissions(now).is_ok());
        assert!(campaign(CampaignStatus::Draft).accepts_submissions(now).is_err());
        assert!(campaign(CampaignStatus::Closed).accepts_submissions(now).is_err());
        assert!(
            campaign(CampaignStatus::Open)
                .accepts_submissions(now + Duration::days(2))
                .is_err()
        );
        assert!(
            campaign(CampaignStatus::Open)
                .accepts_submissions(now - Duration::days(2))
                .is_err()
        );
    }

    #[test]
    fn group_role_uses_plain_names() {
        assert_eq!("self".parse::<GroupRole>().unwrap(), GroupRole::SelfReview);
        assert_eq!(GroupRole::Patient.to_string(), "patient");
        assert_eq!(
            serde_json::to_value(GroupRole::SelfReview).unwrap(),
            serde_json::json!("self")
        );
        assert!("mentor".parse::<GroupRole>().is_err());
    }
}
