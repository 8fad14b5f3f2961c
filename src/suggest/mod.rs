//! AI position suggestion boundary
//!
//! The vision service is an external collaborator: it receives the main
//! product image plus candidate dot images and answers free text per
//! candidate. This module owns the response contract — extracting the
//! `Left: X%, Top: Y%` pair, recognizing a rate-limit retry hint inside
//! an error body, and applying the per-dot outcomes to a row. A reply
//! that matches nothing is a missing position for that candidate, never
//! an error for the batch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::core::Row;

static LEFT_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Left:?\s*([\d.]+)\s*%").expect("left percent regex"));
static TOP_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Top:?\s*([\d.]+)\s*%").expect("top percent regex"));

/// Rate-limit hints ride inside upstream error text as
/// `"retryDelay":"49s"`.
static RETRY_DELAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""retryDelay"\s*:\s*"([^"]+)""#).expect("retry delay regex"));

/// A suggested placement extracted from one reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPosition {
    pub top: String,
    pub left: String,
}

/// Per-candidate outcome of one suggestion round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSuggestion {
    pub sku: String,
    #[serde(default)]
    pub position: Option<SuggestedPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<String>,
}

impl PositionSuggestion {
    /// Build an outcome from a raw model reply.
    pub fn from_reply(sku: impl Into<String>, reply: &str) -> Self {
        Self {
            sku: sku.into(),
            position: parse_position_reply(reply),
            retry_delay: None,
        }
    }

    /// Build an outcome from an upstream error body; carries a retry
    /// hint when one is present.
    pub fn from_error(sku: impl Into<String>, error_text: &str) -> Self {
        Self {
            sku: sku.into(),
            position: None,
            retry_delay: extract_retry_delay(error_text),
        }
    }
}

/// What the caller needs to decide between retrying and reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub fail_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<String>,
}

/// Extract `Left`/`Top` percentages from free text. Both must be present.
pub fn parse_position_reply(reply: &str) -> Option<SuggestedPosition> {
    let left = LEFT_PERCENT.captures(reply)?;
    let top = TOP_PERCENT.captures(reply)?;
    Some(SuggestedPosition {
        top: format!("{}%", &top[1]),
        left: format!("{}%", &left[1]),
    })
}

/// Pull the retry hint out of an upstream error body, if any.
pub fn extract_retry_delay(error_text: &str) -> Option<String> {
    RETRY_DELAY
        .captures(error_text)
        .map(|caps| caps[1].to_string())
}

/// Apply one round of suggestions to a row. Only dots with a suggested
/// position change; everything else keeps its authored state. The
/// summary reports how many candidates failed and the first retry hint
/// seen.
pub fn apply_suggestions(row: &Row, suggestions: &[PositionSuggestion]) -> (Row, SuggestionSummary) {
    let mut updated = row.clone();
    let mut summary = SuggestionSummary::default();

    for suggestion in suggestions {
        match &suggestion.position {
            Some(position) => {
                updated.set_dot_position(&suggestion.sku, &position.top, &position.left);
            }
            None => summary.fail_count += 1,
        }
        if summary.retry_delay.is_none() {
            summary.retry_delay = suggestion.retry_delay.clone();
        }
    }

    (updated, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::DotSku;

    #[test]
    fn test_parse_position_reply() {
        let position = parse_position_reply("Left: 42.5%, Top: 17%").unwrap();
        assert_eq!(position.left, "42.5%");
        assert_eq!(position.top, "17%");
    }

    #[test]
    fn test_parse_tolerates_casing_and_spacing() {
        let position = parse_position_reply("left 10 % ... TOP:  20.25  %").unwrap();
        assert_eq!(position.left, "10%");
        assert_eq!(position.top, "20.25%");
    }

    #[test]
    fn test_missing_axis_is_none() {
        assert!(parse_position_reply("Left: 42%").is_none());
        assert!(parse_position_reply("Not found").is_none());
    }

    #[test]
    fn test_extract_retry_delay() {
        let err = r#"429 { "error": { "details": [{"retryDelay":"49s"}] } }"#;
        assert_eq!(extract_retry_delay(err), Some("49s".to_string()));
        assert_eq!(extract_retry_delay("plain failure"), None);
    }

    #[test]
    fn test_apply_suggestions_updates_only_matched_dots() {
        let mut row = Row::new("main");
        row.dot_skus.push(DotSku::new("a"));
        row.dot_skus.push(DotSku::with_position("b", "1%", "2%"));

        let suggestions = vec![
            PositionSuggestion::from_reply("a", "Left: 30%, Top: 40%"),
            PositionSuggestion::from_reply("b", "Not found"),
        ];
        let (updated, summary) = apply_suggestions(&row, &suggestions);

        assert_eq!(updated.dot_skus[0].top, "40%");
        assert_eq!(updated.dot_skus[0].left, "30%");
        // The failed candidate keeps its authored position.
        assert_eq!(updated.dot_skus[1].top, "1%");
        assert_eq!(summary.fail_count, 1);
        assert_eq!(summary.retry_delay, None);
    }

    #[test]
    fn test_rate_limit_hint_surfaces_in_summary() {
        let row = Row::new("main");
        let suggestions = vec![PositionSuggestion::from_error(
            "a",
            r#"quota exceeded "retryDelay":"12s""#,
        )];
        let (_, summary) = apply_suggestions(&row, &suggestions);
        assert_eq!(summary.fail_count, 1);
        assert_eq!(summary.retry_delay, Some("12s".to_string()));
    }
}
