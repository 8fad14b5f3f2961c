//! Export serializers
//!
//! Deterministic, round-trippable encodings of the canonical row list:
//! consolidated CSV text, the `allRecomComboData` script block, and the
//! spreadsheet value grid. All pure functions; no I/O.

pub mod csv;
pub mod script;
pub mod sheet;

pub use csv::to_csv;
pub use script::{collect_dot_skus, rows_to_combo_items, to_script_block};
pub use sheet::{clear_range, escape_sheet_name, rows_to_sheet_values, sheet_values_to_rows, update_range};

use crate::models::core::{DotSku, Row};

/// Consolidated-format column order, shared by CSV and sheet exports.
pub const EXPORT_HEADERS: [&str; 6] = [
    "product_sku",
    "prod_name",
    "url",
    "img",
    "dot_skus",
    "dot_pos",
];

/// The six consolidated fields for one row, unescaped.
pub(crate) fn consolidated_fields(row: &Row) -> [String; 6] {
    let visible: Vec<&DotSku> = row.visible_dots().collect();

    let dot_skus = visible
        .iter()
        .map(|dot| dot.sku.trim())
        .collect::<Vec<_>>()
        .join(";");
    let dot_pos = visible
        .iter()
        .map(|dot| encode_position(dot))
        .collect::<Vec<_>>()
        .join(";");

    [
        row.product_sku.clone(),
        row.prod_name.clone(),
        row.url.clone(),
        row.img.clone().unwrap_or_default(),
        dot_skus,
        dot_pos,
    ]
}

/// Exact inverse of the consolidated position decoding: `top:left`,
/// `top:`, `:left`, or empty. Unset coordinates stay unset.
pub(crate) fn encode_position(dot: &DotSku) -> String {
    match (!dot.top.is_empty(), !dot.left.is_empty()) {
        (true, true) => format!("{}:{}", dot.top, dot.left),
        (true, false) => format!("{}:", dot.top),
        (false, true) => format!(":{}", dot.left),
        (false, false) => String::new(),
    }
}
