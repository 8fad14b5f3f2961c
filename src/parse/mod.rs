//! Parsing module for the combo editor
//!
//! Converts the heterogeneous input encodings (CSV, HTML-embedded script
//! array, raw JS array literal) into canonical rows.

pub mod combo;
pub mod csv;
pub mod literal;

pub use combo::{items_to_rows, parse_combo_text, RawComboDot, RawComboItem, COMBO_DATA_VARIABLE};
pub use csv::{parse_csv, split_position};
pub use literal::{parse_literal, parse_literal_prefix};

use crate::config::EditorConfig;
use crate::error::ParseError;
use crate::models::core::Row;

/// Caller hint for the input encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Probe the structure: CSV first, then script/array literal.
    #[default]
    Auto,
    Csv,
    Script,
}

/// Header markers that identify a tabular export.
const CSV_HEADER_MARKERS: [&str; 7] = [
    "product_sku",
    "dot_skus",
    "dot_pos",
    "dot1_sku",
    "白點商品",
    "需修改品項",
    "前台連結",
];

/// Parse input text into canonical rows.
///
/// Rows produced here still carry empty `prod_name`/`url` for the
/// non-legacy formats; the metadata resolver backfills those.
pub fn parse(input: &str, hint: FormatHint, config: &EditorConfig) -> Result<Vec<Row>, ParseError> {
    let use_csv = match hint {
        FormatHint::Csv => true,
        FormatHint::Script => false,
        FormatHint::Auto => probe_csv_header(input),
    };

    if use_csv {
        parse_csv(input)
    } else {
        let items = parse_combo_text(input)?;
        Ok(items_to_rows(items, config))
    }
}

/// Structural probe: does the first non-blank line look like one of the
/// known tabular headers? Markup and array literals never do.
fn probe_csv_header(input: &str) -> bool {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let Some(first_line) = input.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    if first_line.contains('<') || first_line.trim_start().starts_with('[') {
        return false;
    }
    CSV_HEADER_MARKERS
        .iter()
        .any(|marker| first_line.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EditorConfig {
        EditorConfig::new("https://shop.example.com", "https://media.example.com").unwrap()
    }

    #[test]
    fn test_auto_detects_csv() {
        let rows = parse(
            "product_sku,dot_skus,dot_pos\nsku1,a;b,\n",
            FormatHint::Auto,
            &test_config(),
        )
        .unwrap();
        assert_eq!(rows[0].product_sku, "sku1");
    }

    #[test]
    fn test_auto_detects_script() {
        let rows = parse(
            "<script>const allRecomComboData=[{sku:'A'}]</script>",
            FormatHint::Auto,
            &test_config(),
        )
        .unwrap();
        assert_eq!(rows[0].product_sku, "A");
    }

    #[test]
    fn test_auto_detects_raw_literal() {
        let rows = parse("[{sku: 'A'}]", FormatHint::Auto, &test_config()).unwrap();
        assert_eq!(rows[0].product_sku, "A");
    }

    #[test]
    fn test_csv_hint_bypasses_probing() {
        // With an explicit hint the input goes straight to the CSV
        // reader: a lone array literal is just a header with no records.
        let rows = parse("[{sku: 'A'}]", FormatHint::Csv, &test_config()).unwrap();
        assert!(rows.is_empty());
    }
}
