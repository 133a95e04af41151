use serde::{Deserialize, Serialize};

/// 列表查询的页码与每页条数，兼容字符串形式的数字
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "first_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_page_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: first_page(),
            size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

fn first_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_numbers_and_numeric_strings() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page": "3", "size": 25}"#).unwrap();
        assert_eq!((q.page, q.size), (3, 25));

        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.page, q.size), (1, 10));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "x"}"#).is_err());
    }
}
