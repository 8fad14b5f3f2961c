//! Spreadsheet value grid
//!
//! Pull and push both speak the consolidated six-column shape (push
//! includes the header row). Pushing is full-replace: the collaborator
//! clears a bounded range and rewrites the whole table, so the range
//! helpers here size the clear to cover stale data.

use crate::models::core::{normalize_image, DotSku, Row};
use crate::parse::csv::split_position;

use super::{consolidated_fields, EXPORT_HEADERS};

/// Push payload: header row plus one consolidated row per combo entry.
pub fn rows_to_sheet_values(rows: &[Row]) -> Vec<Vec<String>> {
    let mut values = Vec::with_capacity(rows.len() + 1);
    values.push(EXPORT_HEADERS.iter().map(|h| h.to_string()).collect());
    for row in rows {
        values.push(consolidated_fields(row).to_vec());
    }
    values
}

/// Convert pulled sheet data (header already skipped) back into rows.
///
/// Missing trailing cells read as empty; names and URLs are backfilled
/// by the resolver afterwards, same as the CSV import path.
pub fn sheet_values_to_rows(values: &[Vec<String>]) -> Vec<Row> {
    values
        .iter()
        .map(|record| {
            let cell = |i: usize| record.get(i).map(String::as_str).unwrap_or("").trim();

            let mut dot_skus = Vec::new();
            let sku_list = cell(4);
            if !sku_list.is_empty() {
                let positions: Vec<&str> = if cell(5).is_empty() {
                    Vec::new()
                } else {
                    cell(5).split(';').map(str::trim).collect()
                };
                for (i, sku) in sku_list
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .enumerate()
                {
                    let (top, left) = split_position(positions.get(i).copied().unwrap_or(""));
                    dot_skus.push(DotSku::with_position(sku, top, left));
                }
            }

            Row {
                product_sku: cell(0).to_string(),
                prod_name: cell(1).to_string(),
                url: cell(2).to_string(),
                img: normalize_image(cell(3)),
                dot_skus,
            }
        })
        .collect()
}

/// Quote a sheet name containing spaces or quotes, doubling inner
/// quotes, for use inside an A1-notation range.
pub fn escape_sheet_name(name: &str) -> String {
    if name.contains(' ') || name.contains('\'') {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}

/// Range cleared before a push. Covers at least 1000 rows so a shrinking
/// table leaves no stale tail behind.
pub fn clear_range(sheet_name: &str, row_count: usize) -> String {
    format!(
        "{}!A1:Z{}",
        escape_sheet_name(sheet_name),
        (row_count + 100).max(1000)
    )
}

/// Anchor cell for the rewrite.
pub fn update_range(sheet_name: &str) -> String {
    format!("{}!A1", escape_sheet_name(sheet_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_payload_includes_header() {
        let mut row = Row::new("sku1");
        row.dot_skus = vec![DotSku::with_position("a", "50%", "30%")];
        let values = rows_to_sheet_values(&[row]);
        assert_eq!(values[0][0], "product_sku");
        assert_eq!(values[1], vec!["sku1", "", "", "", "a", "50%:30%"]);
    }

    #[test]
    fn test_pull_roundtrip() {
        let mut row = Row::new("sku1");
        row.prod_name = "Product".to_string();
        row.url = "https://shop/x.html".to_string();
        row.img = Some("https://media/x.jpg".to_string());
        row.dot_skus = vec![
            DotSku::with_position("a", "50%", "30%"),
            DotSku::with_position("b", "", "10%"),
        ];

        let values = rows_to_sheet_values(&[row.clone()]);
        let rows = sheet_values_to_rows(&values[1..]);
        assert_eq!(rows, vec![row]);
    }

    #[test]
    fn test_short_records_tolerated() {
        let values = vec![vec!["sku1".to_string()]];
        let rows = sheet_values_to_rows(&values);
        assert_eq!(rows[0].product_sku, "sku1");
        assert_eq!(rows[0].img, None);
        assert!(rows[0].dot_skus.is_empty());
    }

    #[test]
    fn test_sheet_name_escaping() {
        assert_eq!(escape_sheet_name("Data"), "Data");
        assert_eq!(escape_sheet_name("My Data"), "'My Data'");
        assert_eq!(escape_sheet_name("It's"), "'It''s'");
    }

    #[test]
    fn test_clear_range_bounds() {
        assert_eq!(clear_range("Data", 5), "Data!A1:Z1000");
        assert_eq!(clear_range("Data", 2000), "Data!A1:Z2100");
        assert_eq!(update_range("My Data"), "'My Data'!A1");
    }
}
