//! Script-block writer
//!
//! Emits the combo data as a JS object-literal array (unquoted keys)
//! assigned to the canonical `allRecomComboData` variable and wrapped in
//! a script tag — the format the CMS snippet expects back. Each dot's
//! storefront link is re-derived from a resolved absolute URL into the
//! templated notation, and omitted entirely when no URL resolves.

use std::collections::HashMap;

use crate::models::core::Row;
use crate::parse::combo::COMBO_DATA_VARIABLE;
use crate::utils::media::store_direct_url;

/// One exported combo entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboExportItem {
    pub name: String,
    pub sku: String,
    pub img: String,
    pub dots: Vec<ComboExportDot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboExportDot {
    pub sku: String,
    pub top: String,
    pub left: String,
    /// Templated storefront link; omitted from the output when absent.
    pub url: Option<String>,
}

/// Unique dot SKUs across all rows, for the export-time URL lookup.
pub fn collect_dot_skus(rows: &[Row]) -> Vec<String> {
    let mut skus = Vec::new();
    for row in rows {
        for dot in row.visible_dots() {
            if !skus.contains(&dot.sku) {
                skus.push(dot.sku.clone());
            }
        }
    }
    skus
}

/// Build export items, synthesizing each dot's templated link from the
/// resolved URL map.
pub fn rows_to_combo_items(
    rows: &[Row],
    dot_url_lookup: &HashMap<String, String>,
) -> Vec<ComboExportItem> {
    rows.iter()
        .map(|row| ComboExportItem {
            name: row.prod_name.clone(),
            sku: row.product_sku.clone(),
            img: row.img.clone().unwrap_or_default(),
            dots: row
                .visible_dots()
                .map(|dot| ComboExportDot {
                    sku: dot.sku.clone(),
                    top: dot.top.clone(),
                    left: dot.left.clone(),
                    url: dot_url_lookup
                        .get(&dot.sku)
                        .and_then(|url| store_direct_url(url)),
                })
                .collect(),
        })
        .collect()
}

/// Serialize rows into the full script block.
pub fn to_script_block(rows: &[Row], dot_url_lookup: &HashMap<String, String>) -> String {
    let items = rows_to_combo_items(rows, dot_url_lookup);
    format!(
        "<script>\nconst {} = {};\n</script>",
        COMBO_DATA_VARIABLE,
        write_items(&items)
    )
}

// ============================================================================
// JS-literal writer
// ============================================================================
//
// Two-space indentation; `indent` counts nesting levels. Keys are bare
// identifiers; strings escape quotes and newlines only.

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

fn js_string(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\"").replace('\n', "\\n"))
}

fn write_items(items: &[ComboExportItem]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let body: Vec<String> = items
        .iter()
        .map(|item| format!("{}{}", pad(1), write_item(item, 1)))
        .collect();
    format!("[\n{}\n]", body.join(",\n"))
}

fn write_item(item: &ComboExportItem, indent: usize) -> String {
    let inner = pad(indent + 1);
    let fields = [
        format!("{}name: {}", inner, js_string(&item.name)),
        format!("{}sku: {}", inner, js_string(&item.sku)),
        format!("{}img: {}", inner, js_string(&item.img)),
        format!("{}dots: {}", inner, write_dots(&item.dots, indent + 1)),
    ];
    format!("{{\n{}\n{}}}", fields.join(",\n"), pad(indent))
}

fn write_dots(dots: &[ComboExportDot], indent: usize) -> String {
    if dots.is_empty() {
        return "[]".to_string();
    }
    let body: Vec<String> = dots
        .iter()
        .map(|dot| format!("{}{}", pad(indent + 1), write_dot(dot, indent + 1)))
        .collect();
    format!("[\n{}\n{}]", body.join(",\n"), pad(indent))
}

fn write_dot(dot: &ComboExportDot, indent: usize) -> String {
    let inner = pad(indent + 1);
    let mut fields = vec![
        format!("{}sku: {}", inner, js_string(&dot.sku)),
        format!("{}top: {}", inner, js_string(&dot.top)),
        format!("{}left: {}", inner, js_string(&dot.left)),
    ];
    if let Some(url) = &dot.url {
        fields.push(format!("{}url: {}", inner, js_string(url)));
    }
    format!("{{\n{}\n{}}}", fields.join(",\n"), pad(indent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::DotSku;

    fn lookup(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_rows() {
        let block = to_script_block(&[], &HashMap::new());
        assert_eq!(block, "<script>\nconst allRecomComboData = [];\n</script>");
    }

    #[test]
    fn test_dot_url_synthesized_or_omitted() {
        let mut row = Row::new("main");
        row.dot_skus = vec![DotSku::with_position("a", "10%", "20%"), DotSku::new("b")];

        let items = rows_to_combo_items(
            &[row],
            &lookup(&[("a", "https://shop.example.com/fancy-sofa.html")]),
        );
        assert_eq!(
            items[0].dots[0].url.as_deref(),
            Some("{{store direct_url='fancy-sofa.html'}}")
        );
        assert_eq!(items[0].dots[1].url, None);
    }

    #[test]
    fn test_script_block_shape() {
        let mut row = Row::new("A");
        row.prod_name = "Product A".to_string();
        row.img = Some("https://media.example.com/p/a.jpg".to_string());
        row.dot_skus = vec![DotSku::with_position("B", "10%", "20%")];

        let block = to_script_block(
            &[row],
            &lookup(&[("B", "https://shop.example.com/b-item.html")]),
        );

        let expected = "<script>\n\
                        const allRecomComboData = [\n  \
                        {\n    \
                        name: \"Product A\",\n    \
                        sku: \"A\",\n    \
                        img: \"https://media.example.com/p/a.jpg\",\n    \
                        dots: [\n      \
                        {\n        \
                        sku: \"B\",\n        \
                        top: \"10%\",\n        \
                        left: \"20%\",\n        \
                        url: \"{{store direct_url='b-item.html'}}\"\n      \
                        }\n    \
                        ]\n  \
                        }\n\
                        ];\n\
                        </script>";
        assert_eq!(block, expected);
    }

    #[test]
    fn test_unquoted_keys() {
        let mut row = Row::new("A");
        row.dot_skus = vec![DotSku::new("B")];
        let block = to_script_block(&[row], &HashMap::new());
        assert!(block.contains("sku: \"A\""));
        assert!(!block.contains("\"sku\":"));
    }

    #[test]
    fn test_collect_dot_skus_unique_in_order() {
        let mut row1 = Row::new("m1");
        row1.dot_skus = vec![DotSku::new("a"), DotSku::new("b")];
        let mut row2 = Row::new("m2");
        row2.dot_skus = vec![DotSku::new("b"), DotSku::new("c"), DotSku::new("")];

        assert_eq!(collect_dot_skus(&[row1, row2]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_round_trips_through_parser() {
        use crate::config::EditorConfig;
        use crate::parse::{parse, FormatHint};

        let mut row = Row::new("A");
        row.dot_skus = vec![
            DotSku::with_position("B", "10%", "20%"),
            DotSku::with_position("C", "5%", ""),
        ];

        let block = to_script_block(&[row.clone()], &HashMap::new());
        let config =
            EditorConfig::new("https://shop.example.com", "https://media.example.com").unwrap();
        let parsed = parse(&block, FormatHint::Auto, &config).unwrap();

        assert_eq!(parsed[0].product_sku, "A");
        assert_eq!(parsed[0].dot_skus, row.dot_skus);
    }
}
