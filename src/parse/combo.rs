//! Script-embedded combo data
//!
//! CMS snippets carry the combo array either inside one or more
//! `<script>` blocks or as a bare array literal. The canonical variable
//! name is `allRecomComboData`. Evaluation strategies, tried in order,
//! first success wins:
//!
//! 1. the literal assigned to the canonical variable
//! 2. the slice between the first `[` and the last `]`
//! 3. the whole content as a single array expression
//!
//! Items that fail shape validation are dropped from the batch (with the
//! field-level detail logged); only a fully unrecognized input is an
//! error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::config::EditorConfig;
use crate::error::ParseError;
use crate::models::core::{DotSku, Row};
use crate::parse::literal::{parse_literal, parse_literal_prefix};
use crate::utils::media::parse_media_url;

/// Canonical name of the embedded combo array variable.
pub const COMBO_DATA_VARIABLE: &str = "allRecomComboData";

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script block regex"));

static COMBO_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}\s*=", COMBO_DATA_VARIABLE)).expect("combo assignment regex")
});

/// One parsed combo entry before catalog enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComboItem {
    pub sku: String,
    pub name: String,
    /// Raw image value; may still be in templated media notation.
    pub img: String,
    pub dots: Vec<RawComboDot>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawComboDot {
    pub sku: String,
    pub top: String,
    pub left: String,
}

/// Parse HTML/JS combo text into raw items.
pub fn parse_combo_text(text: &str) -> Result<Vec<RawComboItem>, ParseError> {
    let content = extract_script_content(text).unwrap_or_else(|| text.to_string());
    let array = evaluate_array(&content)?;

    let mut items = Vec::new();
    for (index, value) in array.iter().enumerate() {
        match RawComboItem::from_value(index, value) {
            Ok(item) => items.push(item),
            // Malformed entries are dropped, not fatal.
            Err(err) => log::debug!("dropping combo item: {}", err),
        }
    }
    Ok(items)
}

/// Convert raw items into rows, normalizing templated image paths.
///
/// Storefront URLs are not present in the embedded format; the metadata
/// resolver derives them from the product SKU afterwards.
pub fn items_to_rows(items: Vec<RawComboItem>, config: &EditorConfig) -> Vec<Row> {
    items
        .into_iter()
        .map(|item| Row {
            product_sku: item.sku,
            prod_name: item.name,
            url: String::new(),
            img: parse_media_url(&item.img, &config.media_url),
            dot_skus: item
                .dots
                .into_iter()
                .map(|dot| DotSku::with_position(dot.sku, dot.top, dot.left))
                .collect(),
        })
        .collect()
}

/// Concatenate the contents of all `<script>` blocks, if any.
fn extract_script_content(text: &str) -> Option<String> {
    let blocks: Vec<&str> = SCRIPT_BLOCK
        .captures_iter(text)
        .map(|caps| caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""))
        .collect();
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

/// Run the three evaluation strategies; each failure is skipped in order.
fn evaluate_array(content: &str) -> Result<Vec<Value>, ParseError> {
    // Strategy 1: literal assigned to the canonical variable.
    if let Some(found) = COMBO_ASSIGNMENT.find(content) {
        if let Ok(Value::Array(items)) = parse_literal_prefix(&content[found.end()..]) {
            return Ok(items);
        }
    }

    // Strategy 2: slice between the first `[` and the last `]`.
    if let (Some(start), Some(end)) = (content.find('['), content.rfind(']')) {
        if end > start {
            if let Ok(Value::Array(items)) = parse_literal(&content[start..=end]) {
                return Ok(items);
            }
        }
    }

    // Strategy 3: the whole content as one array expression.
    if let Ok(Value::Array(items)) = parse_literal(content) {
        return Ok(items);
    }

    Err(ParseError::NotAnArray)
}

impl RawComboItem {
    /// Explicit shape validation with field-level context.
    fn from_value(index: usize, value: &Value) -> Result<Self, ParseError> {
        let context = format!("item {}", index);
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::shape(&context, describe_mismatch("object", value)))?;

        let sku = field_string(object, "sku");
        if sku.is_empty() {
            return Err(ParseError::shape(&context, "missing `sku`"));
        }

        let mut dots = Vec::new();
        if let Some(Value::Array(entries)) = object.get("dots") {
            for entry in entries {
                let Some(dot) = entry.as_object() else {
                    continue;
                };
                let dot_sku = field_string(dot, "sku");
                if dot_sku.is_empty() {
                    continue;
                }
                dots.push(RawComboDot {
                    sku: dot_sku,
                    top: field_string(dot, "top"),
                    left: field_string(dot, "left"),
                });
            }
        }

        Ok(Self {
            sku,
            name: field_string(object, "name"),
            img: field_string(object, "img"),
            dots,
        })
    }
}

fn field_string(object: &serde_json::Map<String, Value>, key: &str) -> String {
    object.get(key).map(value_to_string).unwrap_or_default()
}

/// Loose stringification: null stays empty, scalars print themselves.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn describe_mismatch(expected: &str, found: &Value) -> String {
    let kind = match found {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("expected {}, found {}", expected, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EditorConfig {
        EditorConfig::new("https://shop.example.com", "https://media.example.com").unwrap()
    }

    #[test]
    fn test_script_block_with_assignment() {
        let html = "<script>const allRecomComboData=[{sku:\"A\",img:\"{{media url=p/a.jpg}}\",\
                    dots:[{sku:\"B\",top:\"10%\",left:\"20%\"}]}]</script>";
        let items = parse_combo_text(html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku, "A");
        assert_eq!(items[0].dots[0].top, "10%");

        let rows = items_to_rows(items, &test_config());
        assert_eq!(
            rows[0].img.as_deref(),
            Some("https://media.example.com/p/a.jpg")
        );
        assert_eq!(
            rows[0].dot_skus,
            vec![DotSku::with_position("B", "10%", "20%")]
        );
    }

    #[test]
    fn test_multiple_script_blocks_concatenated() {
        let html = "<script>// preamble</script>\
                    <script>const allRecomComboData = [{sku: 'A', dots: []}]</script>";
        let items = parse_combo_text(html).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_raw_array_without_script_tags() {
        let items = parse_combo_text("[{sku: 'A'}, {sku: 'B'}]").unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_bracket_slice_fallback() {
        // No assignment to the canonical name; surrounding prose forces
        // strategy 2.
        let text = "paste below\n[{sku: 'A', dots: [{sku: 'B', top: '', left: ''}]}]\nend";
        let items = parse_combo_text(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].dots.len(), 1);
    }

    #[test]
    fn test_malformed_items_dropped_silently() {
        let items = parse_combo_text("[{sku: 'A'}, 'junk', {name: 'no sku'}, {sku: 'B'}]").unwrap();
        let skus: Vec<&str> = items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B"]);
    }

    #[test]
    fn test_dot_without_sku_skipped() {
        let items =
            parse_combo_text("[{sku: 'A', dots: [{top: '1%'}, {sku: 'B', top: '2%', left: ''}]}]")
                .unwrap();
        assert_eq!(items[0].dots.len(), 1);
        assert_eq!(items[0].dots[0].sku, "B");
    }

    #[test]
    fn test_nothing_recognizable() {
        assert_eq!(
            parse_combo_text("hello world"),
            Err(ParseError::NotAnArray)
        );
    }

    #[test]
    fn test_numeric_sku_stringified() {
        let items = parse_combo_text("[{sku: 1017750, dots: []}]").unwrap();
        assert_eq!(items[0].sku, "1017750");
    }
}
