//! 量表评分与 CLO 汇总
//!
//! 纯计算，不访问存储。直接观察与 360° 评价提交共用。

use std::collections::{HashMap, HashSet};

use crate::errors::Result;
use crate::models::observations::entities::{CloResultStatus, NewCloResult, NewObservationItem};
use crate::models::observations::requests::ItemScoreInput;
use crate::models::rubrics::entities::RubricDefinition;
use crate::utils::moderation;

/// 评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItems {
    pub items: Vec<NewObservationItem>,
    pub total_score: f64,
    pub max_score: f64,
    pub clo_results: Vec<NewCloResult>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按量表给分：每行恰好一个分数，且在 [0, 最高列分] 内
pub fn score_items(
    definition: &RubricDefinition,
    inputs: &[ItemScoreInput],
    pass_threshold: f64,
) -> std::result::Result<ScoredItems, String> {
    let row_max = definition.max_column_score();

    let mut by_key: HashMap<&str, &ItemScoreInput> = HashMap::new();
    for input in inputs {
        if definition.row(&input.row_key).is_none() {
            return Err(format!("量表中不存在行 {}", input.row_key));
        }
        if by_key.insert(input.row_key.as_str(), input).is_some() {
            return Err(format!("行 {} 重复评分", input.row_key));
        }
        if !input.score.is_finite() || input.score < 0.0 || input.score > row_max {
            return Err(format!(
                "行 {} 的得分 {} 超出范围 [0, {row_max}]",
                input.row_key, input.score
            ));
        }
    }

    // 按量表行顺序输出
    let mut items = Vec::with_capacity(definition.rows.len());
    for row in &definition.rows {
        let Some(input) = by_key.get(row.key.as_str()) else {
            return Err(format!("缺少行 {} 的评分", row.key));
        };
        items.push(NewObservationItem {
            row_key: row.key.clone(),
            clo_id: row.clo_id,
            score: input.score,
            max_score: row_max,
            weight: row.weight,
            comment: input
                .comment
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        });
    }

    let total_score: f64 = items.iter().map(|i| i.weight * i.score).sum();
    let max_score: f64 = items.iter().map(|i| i.weight * i.max_score).sum();

    Ok(ScoredItems {
        clo_results: roll_up_clos(&items, pass_threshold),
        total_score: round2(total_score),
        max_score: round2(max_score),
        items,
    })
}

/// 每个被引用的 CLO：100·Σ(w·s)/Σ(w·max)，达到及格线即 achieved
pub fn roll_up_clos(items: &[NewObservationItem], pass_threshold: f64) -> Vec<NewCloResult> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut sums: HashMap<i64, (f64, f64)> = HashMap::new();

    for item in items {
        let Some(clo_id) = item.clo_id else {
            continue;
        };
        if seen.insert(clo_id) {
            order.push(clo_id);
        }
        let entry = sums.entry(clo_id).or_insert((0.0, 0.0));
        entry.0 += item.weight * item.score;
        entry.1 += item.weight * item.max_score;
    }

    order
        .into_iter()
        .filter_map(|clo_id| {
            let (earned, possible) = sums.get(&clo_id).copied()?;
            if possible <= 0.0 {
                return None;
            }
            let score_percent = round2(100.0 * earned / possible);
            let status = if score_percent >= pass_threshold {
                CloResultStatus::Achieved
            } else {
                CloResultStatus::NotAchieved
            };
            Some(NewCloResult {
                clo_id,
                score_percent,
                status,
            })
        })
        .collect()
}

/// 整体评语与逐项评语过审核
pub fn moderate_comments(inputs: &[ItemScoreInput], comment: Option<&str>) -> Result<()> {
    moderation::check_optional("comment", comment)?;
    for input in inputs {
        moderation::check_optional(
            &format!("items.{}.comment", input.row_key),
            input.comment.as_deref(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> RubricDefinition {
        serde_json::from_value(serde_json::json!({
            "rows": [
                {"key": "comm", "label": "Communication", "clo_id": 10, "weight": 2.0},
                {"key": "team", "label": "Teamwork", "clo_id": 10, "weight": 1.0},
                {"key": "ethic", "label": "Ethics", "clo_id": 11, "weight": 1.0},
                {"key": "misc", "label": "Other", "weight": 1.0}
            ],
            "columns": [
                {"label": "Poor", "score": 0},
                {"label": "Fair", "score": 2},
                {"label": "Excellent", "score": 4}
            ],
            "pass_threshold": 60
        }))
        .unwrap()
    }

    fn input(key: &str, score: f64) -> ItemScoreInput {
        ItemScoreInput {
            row_key: key.into(),
            score,
            comment: None,
        }
    }

    #[test]
    fn totals_and_clo_percentages_are_weighted() {
        let def = definition();
        let scored = score_items(
            &def,
            &[
                input("team", 2.0),
                input("comm", 4.0),
                input("ethic", 1.0),
                input("misc", 0.0),
            ],
            def.effective_pass_threshold(50.0),
        )
        .unwrap();

        // 2*4 + 1*2 + 1*1 + 1*0
        assert_eq!(scored.total_score, 11.0);
        // (2+1+1+1) * 4
        assert_eq!(scored.max_score, 20.0);
        assert_eq!(scored.items[0].row_key, "comm");

        assert_eq!(scored.clo_results.len(), 2);
        let clo10 = &scored.clo_results[0];
        assert_eq!(clo10.clo_id, 10);
        // (8 + 2) / (8 + 4)
        assert_eq!(clo10.score_percent, 83.33);
        assert_eq!(clo10.status, CloResultStatus::Achieved);
        let clo11 = &scored.clo_results[1];
        assert_eq!(clo11.score_percent, 25.0);
        assert_eq!(clo11.status, CloResultStatus::NotAchieved);
    }

    #[test]
    fn threshold_is_inclusive() {
        let def = definition();
        let scored = score_items(
            &def,
            &[
                input("comm", 2.0),
                input("team", 4.0),
                input("ethic", 2.4),
                input("misc", 4.0),
            ],
            60.0,
        )
        .unwrap();
        assert_eq!(scored.clo_results[1].score_percent, 60.0);
        assert_eq!(scored.clo_results[1].status, CloResultStatus::Achieved);
    }

    #[test]
    fn every_row_must_be_scored_once() {
        let def = definition();
        let missing = score_items(&def, &[input("comm", 1.0)], 60.0).unwrap_err();
        assert!(missing.contains("缺少"));

        let duplicate =
            score_items(&def, &[input("comm", 1.0), input("comm", 2.0)], 60.0).unwrap_err();
        assert!(duplicate.contains("重复"));

        let unknown = score_items(&def, &[input("nope", 1.0)], 60.0).unwrap_err();
        assert!(unknown.contains("nope"));
    }

    #[test]
    fn scores_outside_column_range_are_rejected() {
        let def = definition();
        let mut inputs = vec![
            input("comm", 5.0),
            input("team", 0.0),
            input("ethic", 0.0),
            input("misc", 0.0),
        ];
        assert!(score_items(&def, &inputs, 60.0).is_err());
        inputs[0].score = -0.5;
        assert!(score_items(&def, &inputs, 60.0).is_err());
        inputs[0].score = f64::NAN;
        assert!(score_items(&def, &inputs, 60.0).is_err());
    }

    #[test]
    fn rows_without_clo_do_not_produce_results() {
        let items = vec![NewObservationItem {
            row_key: "misc".into(),
            clo_id: None,
            score: 3.0,
            max_score: 4.0,
            weight: 1.0,
            comment: None,
        }];
        assert!(roll_up_clos(&items, 50.0).is_empty());
    }
}
