use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// 量表行（一个评价维度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRow {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub clo_id: Option<i64>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

// 量表列（一个等级）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricColumn {
    pub label: String,
    pub score: f64,
}

/// 量表定义，以 JSON 形式存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDefinition {
    pub rows: Vec<RubricRow>,
    pub columns: Vec<RubricColumn>,
    /// 及格线（百分比），缺省取配置中的默认值
    #[serde(default)]
    pub pass_threshold: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

impl RubricDefinition {
    /// 检查结构本身，不涉及 CLO 归属
    pub fn validate(&self) -> Result<(), String> {
        if self.rows.is_empty() {
            return Err("量表至少需要一行".to_string());
        }
        if self.columns.is_empty() {
            return Err("量表至少需要一列".to_string());
        }

        let mut keys = HashSet::new();
        for row in &self.rows {
            if row.key.trim().is_empty() {
                return Err("量表行 key 不能为空".to_string());
            }
            if !keys.insert(row.key.as_str()) {
                return Err(format!("量表行 key 重复: {}", row.key));
            }
            if !row.weight.is_finite() || row.weight <= 0.0 {
                return Err(format!("量表行 {} 的权重必须大于 0", row.key));
            }
        }

        for column in &self.columns {
            if !column.score.is_finite() || column.score < 0.0 {
                return Err(format!("量表列 {} 的分值不能为负", column.label));
            }
        }
        if self.max_column_score() <= 0.0 {
            return Err("量表最高分必须大于 0".to_string());
        }

        if let Some(threshold) = self.pass_threshold
            && !(0.0..=100.0).contains(&threshold)
        {
            return Err("及格线必须在 0 到 100 之间".to_string());
        }

        Ok(())
    }

    /// 单行最高得分
    pub fn max_column_score(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.score)
            .fold(0.0_f64, f64::max)
    }

    pub fn row(&self, key: &str) -> Option<&RubricRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// 引用的全部 CLO（去重）
    pub fn clo_ids(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.clo_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn effective_pass_threshold(&self, default: f64) -> f64 {
        self.pass_threshold.unwrap_or(default)
    }
}

// 量表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    pub id: i64,
    pub framework_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub definition: RubricDefinition,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> RubricDefinition {
        serde_json::from_value(serde_json::json!({
            "rows": [
                {"key": "comm", "label": "Communication", "clo_id": 1, "weight": 2.0},
                {"key": "team", "label": "Teamwork", "clo_id": 1},
                {"key": "ethic", "label": "Ethics", "clo_id": 2}
            ],
            "columns": [
                {"label": "Poor", "score": 1},
                {"label": "Good", "score": 3},
                {"label": "Excellent", "score": 4}
            ],
            "pass_threshold": 60
        }))
        .unwrap()
    }

    #[test]
    fn valid_definition_passes() {
        let def = definition();
        assert!(def.validate().is_ok());
        assert_eq!(def.max_column_score(), 4.0);
        assert_eq!(def.row("team").unwrap().weight, 1.0);
        assert_eq!(def.clo_ids(), vec![1, 2]);
    }

    #[test]
    fn duplicate_row_keys_are_rejected() {
        let mut def = definition();
        def.rows[1].key = "comm".into();
        assert!(def.validate().unwrap_err().contains("重复"));
    }

    #[test]
    fn empty_rows_or_columns_are_rejected() {
        let mut def = definition();
        def.rows.clear();
        assert!(def.validate().is_err());

        let mut def = definition();
        def.columns.clear();
        assert!(def.validate().is_err());
    }

    #[test]
    fn bad_weights_and_scores_are_rejected() {
        let mut def = definition();
        def.rows[0].weight = 0.0;
        assert!(def.validate().is_err());

        let mut def = definition();
        def.columns[0].score = -1.0;
        assert!(def.validate().is_err());
    }

    #[test]
    fn threshold_must_be_a_percentage() {
        let mut def = definition();
        def.pass_threshold = Some(120.0);
        assert!(def.validate().is_err());
        def.pass_threshold = None;
        assert!(def.validate().is_ok());
        assert_eq!(def.effective_pass_threshold(50.0), 50.0);
    }
}
