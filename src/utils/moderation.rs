//! 文本审核
//!
//! 屏蔽词正则在首次使用时从配置编译，忽略大小写。

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::{AqmsError, Result};

static BLOCKLIST: Lazy<Vec<Regex>> =
    Lazy::new(|| compile_blocklist(&AppConfig::get().moderation.blocklist));

fn compile_blocklist(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| warn!("Ignoring invalid moderation pattern '{}': {}", pattern, e))
                .ok()
        })
        .collect()
}

fn first_match<'a>(rules: &[Regex], text: &'a str) -> Option<&'a str> {
    rules
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str())
}

/// 检查一段文本，命中屏蔽词时返回审核错误
pub fn check_text(field: &str, text: &str) -> Result<()> {
    if !AppConfig::get().moderation.enabled {
        return Ok(());
    }
    match first_match(&BLOCKLIST, text) {
        Some(_) => Err(AqmsError::moderation(format!("{field} 含有不当内容"))),
        None => Ok(()),
    }
}

/// 可选文本
pub fn check_optional(field: &str, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) => check_text(field, text),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<Regex> {
        compile_blocklist(&[r"\bidiot\b".to_string(), r"\bshit\w*".to_string()])
    }

    #[test]
    fn matches_ignore_case() {
        let rules = rules();
        assert_eq!(first_match(&rules, "What an IDIOT move"), Some("IDIOT"));
        assert_eq!(first_match(&rules, "shitty work"), Some("shitty"));
    }

    #[test]
    fn clean_text_and_partial_words_pass() {
        let rules = rules();
        assert!(first_match(&rules, "Great teamwork and communication").is_none());
        assert!(first_match(&rules, "idiotic").is_none());
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        let rules = compile_blocklist(&["(unclosed".to_string(), "ok".to_string()]);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn configured_blocklist_rejects_comments() {
        assert!(check_text("comment", "you idiot").is_err());
        assert!(check_optional("comment", None).is_ok());
        assert!(check_text("comment", "well prepared presentation").is_ok());
    }
}
