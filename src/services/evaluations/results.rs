//! 360° 评价的进度与结果汇总

use std::collections::{BTreeMap, HashMap};

use crate::models::evaluations::entities::{EvaluationRequest, GroupRole, RequestStatus};
use crate::models::evaluations::responses::{
    CampaignProgress, EvaluateeResult, RoleProgress, RoleResult, RowAverage,
};
use crate::models::observations::entities::ObservationItem;
use crate::models::rubrics::entities::RubricDefinition;
use crate::models::students::entities::Student;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// 按状态与评价角色统计
pub fn campaign_progress(campaign_id: i64, requests: &[EvaluationRequest]) -> CampaignProgress {
    let mut by_role: BTreeMap<GroupRole, (u64, u64)> = BTreeMap::new();
    let mut submitted = 0;

    for request in requests {
        let entry = by_role.entry(request.group_role).or_insert((0, 0));
        entry.0 += 1;
        if request.status == RequestStatus::Submitted {
            entry.1 += 1;
            submitted += 1;
        }
    }

    let total = requests.len() as u64;
    CampaignProgress {
        campaign_id,
        total,
        pending: total - submitted,
        submitted,
        completion_rate: if total == 0 {
            0.0
        } else {
            round2(100.0 * submitted as f64 / total as f64)
        },
        by_role: by_role
            .into_iter()
            .map(|(group_role, (total, submitted))| RoleProgress {
                group_role,
                total,
                submitted,
            })
            .collect(),
    }
}

/// 一次提交的得分率
fn response_percent(items: &[&ObservationItem]) -> Option<f64> {
    let earned: f64 = items.iter().map(|i| i.weight * i.score).sum();
    let possible: f64 = items.iter().map(|i| i.weight * i.max_score).sum();
    (possible > 0.0).then(|| 100.0 * earned / possible)
}

/// 按量表行顺序计算各行平均分，无数据的行省略
fn row_averages(
    definition: &RubricDefinition,
    responses: &[&Vec<&ObservationItem>],
) -> Vec<RowAverage> {
    definition
        .rows
        .iter()
        .filter_map(|row| {
            let scores: Vec<f64> = responses
                .iter()
                .flat_map(|items| items.iter())
                .filter(|item| item.row_key == row.key)
                .map(|item| item.score)
                .collect();
            (!scores.is_empty()).then(|| RowAverage {
                row_key: row.key.clone(),
                label: row.label.clone(),
                average: mean(&scores),
            })
        })
        .collect()
}

/// 每个被评价学生：各角色及总体的行平均分与平均得分率
///
/// 只统计已提交的请求；学生顺序按学号。
pub fn campaign_results(
    definition: &RubricDefinition,
    requests: &[EvaluationRequest],
    items: &[ObservationItem],
    students: &HashMap<i64, Student>,
) -> Vec<EvaluateeResult> {
    let mut items_by_observation: HashMap<i64, Vec<&ObservationItem>> = HashMap::new();
    for item in items {
        items_by_observation
            .entry(item.observation_id)
            .or_default()
            .push(item);
    }

    // evaluatee -> role -> 每次提交的评分项
    let mut grouped: BTreeMap<i64, BTreeMap<GroupRole, Vec<&Vec<&ObservationItem>>>> =
        BTreeMap::new();
    for request in requests {
        let by_role = grouped.entry(request.evaluatee_id).or_default();
        if request.status != RequestStatus::Submitted {
            continue;
        }
        let Some(observation_items) = request
            .observation_id
            .and_then(|id| items_by_observation.get(&id))
        else {
            continue;
        };
        by_role
            .entry(request.group_role)
            .or_default()
            .push(observation_items);
    }

    let mut results: Vec<EvaluateeResult> = grouped
        .into_iter()
        .filter_map(|(evaluatee_id, by_role)| {
            let student = students.get(&evaluatee_id)?;

            let mut all_responses = Vec::new();
            let mut all_percents = Vec::new();
            let role_results: Vec<RoleResult> = by_role
                .into_iter()
                .map(|(group_role, responses)| {
                    let percents: Vec<f64> = responses
                        .iter()
                        .filter_map(|items| response_percent(items))
                        .collect();
                    all_percents.extend_from_slice(&percents);
                    all_responses.extend(responses.iter().copied());
                    RoleResult {
                        group_role,
                        responses: responses.len(),
                        average_percent: mean(&percents),
                        rows: row_averages(definition, &responses),
                    }
                })
                .collect();

            Some(EvaluateeResult {
                evaluatee_id,
                student_code: student.student_code.clone(),
                full_name: student.full_name.clone(),
                responses: all_responses.len(),
                average_percent: mean(&all_percents),
                overall_rows: row_averages(definition, &all_responses),
                by_role: role_results,
            })
        })
        .collect();

    results.sort_by(|a, b| a.student_code.cmp(&b.student_code));
    results
}

/// 导出表头：固定列后接量表各行
pub fn export_header(definition: &RubricDefinition) -> Vec<String> {
    let mut header: Vec<String> = [
        "student_code",
        "full_name",
        "group_role",
        "responses",
        "average_percent",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(definition.rows.iter().map(|r| r.key.clone()));
    header
}

/// 每个学生每个角色一行，另加 overall 行
pub fn export_rows(
    definition: &RubricDefinition,
    results: &[EvaluateeResult],
) -> Vec<Vec<String>> {
    let row_cells = |rows: &[RowAverage]| -> Vec<String> {
        definition
            .rows
            .iter()
            .map(|def_row| {
                rows.iter()
                    .find(|r| r.row_key == def_row.key)
                    .map(|r| r.average.to_string())
                    .unwrap_or_default()
            })
            .collect()
    };

    let mut lines = Vec::new();
    for result in results {
        for role in &result.by_role {
            let mut line = vec![
                result.student_code.clone(),
                result.full_name.clone(),
                role.group_role.to_string(),
                role.responses.to_string(),
                role.average_percent.to_string(),
            ];
            line.extend(row_cells(&role.rows));
            lines.push(line);
        }
        let mut overall = vec![
            result.student_code.clone(),
            result.full_name.clone(),
            "overall".to_string(),
            result.responses.to_string(),
            result.average_percent.to_string(),
        ];
        overall.extend(row_cells(&result.overall_rows));
        lines.push(overall);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use chrono::Utc;

    fn definition() -> RubricDefinition {
        serde_json::from_value(serde_json::json!({
            "rows": [
                {"key": "comm", "label": "Communication", "weight": 1.0},
                {"key": "skill", "label": "Clinical skill", "weight": 1.0}
            ],
            "columns": [{"label": "Low", "score": 0}, {"label": "High", "score": 4}]
        }))
        .unwrap()
    }

    fn request(
        id: i64,
        evaluatee_id: i64,
        role: GroupRole,
        observation_id: Option<i64>,
    ) -> EvaluationRequest {
        EvaluationRequest {
            id,
            campaign_id: 1,
            evaluator_id: 100 + id,
            evaluatee_id,
            group_role: role,
            status: if observation_id.is_some() {
                RequestStatus::Submitted
            } else {
                RequestStatus::Pending
            },
            observation_id,
            submitted_at: observation_id.map(|_| Utc::now()),
            created_at: Utc::now(),
        }
    }

    fn item(observation_id: i64, row_key: &str, score: f64) -> ObservationItem {
        ObservationItem {
            id: observation_id * 10 + score as i64,
            observation_id,
            row_key: row_key.into(),
            clo_id: None,
            score,
            max_score: 4.0,
            weight: 1.0,
            comment: None,
        }
    }

    fn student(id: i64, code: &str) -> Student {
        Student {
            id,
            user_id: id + 1000,
            framework_id: 1,
            student_code: code.into(),
            full_name: format!("Student {code}"),
            username: code.into(),
            email: format!("{code}@example.com"),
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn progress_counts_by_role() {
        let requests = vec![
            request(1, 7, GroupRole::Peer, Some(1)),
            request(2, 7, GroupRole::Peer, None),
            request(3, 7, GroupRole::SelfReview, Some(2)),
            request(4, 7, GroupRole::Faculty, None),
        ];
        let progress = campaign_progress(1, &requests);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.submitted, 2);
        assert_eq!(progress.pending, 2);
        assert_eq!(progress.completion_rate, 50.0);

        let peer = progress
            .by_role
            .iter()
            .find(|r| r.group_role == GroupRole::Peer)
            .unwrap();
        assert_eq!((peer.total, peer.submitted), (2, 1));
    }

    #[test]
    fn empty_campaign_has_zero_completion() {
        let progress = campaign_progress(9, &[]);
        assert_eq!(progress.completion_rate, 0.0);
        assert!(progress.by_role.is_empty());
    }

    #[test]
    fn results_average_rows_per_role_and_overall() {
        let def = definition();
        let requests = vec![
            request(1, 7, GroupRole::Peer, Some(1)),
            request(2, 7, GroupRole::Peer, Some(2)),
            request(3, 7, GroupRole::SelfReview, Some(3)),
            request(4, 7, GroupRole::Faculty, None),
        ];
        let items = vec![
            item(1, "comm", 4.0),
            item(1, "skill", 2.0),
            item(2, "comm", 2.0),
            item(2, "skill", 2.0),
            item(3, "comm", 3.0),
            item(3, "skill", 1.0),
        ];
        let students = HashMap::from([(7, student(7, "S007"))]);

        let results = campaign_results(&def, &requests, &items, &students);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.responses, 3);

        let peer = result
            .by_role
            .iter()
            .find(|r| r.group_role == GroupRole::Peer)
            .unwrap();
        assert_eq!(peer.responses, 2);
        assert_eq!(peer.rows[0].average, 3.0);
        assert_eq!(peer.rows[1].average, 2.0);
        // (6/8 + 4/8) / 2
        assert_eq!(peer.average_percent, 62.5);

        assert_eq!(result.overall_rows[0].average, 3.0);
        assert_eq!(result.overall_rows[1].average, 1.67);
        // 75, 50, 50
        assert_eq!(result.average_percent, 58.33);

        let header = export_header(&def);
        let lines = export_rows(&def, &results);
        assert_eq!(header.len(), 7);
        // peer, self, overall
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2][2], "overall");
        assert_eq!(lines[2][5], "3");
    }
}
