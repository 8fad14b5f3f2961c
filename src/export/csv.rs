//! Consolidated CSV writer

use super::{consolidated_fields, EXPORT_HEADERS};
use crate::models::core::Row;

/// Serialize rows to consolidated CSV text.
///
/// Round-trip contract: feeding the output back through the CSV parser
/// reproduces the dot SKUs and their (possibly partial) positions
/// exactly.
pub fn to_csv(rows: &[Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));

    for row in rows {
        let fields = consolidated_fields(row);
        let encoded: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        lines.push(encoded.join(","));
    }

    lines.join("\n")
}

/// Quote a field containing a comma, quote, or newline; inner quotes
/// double.
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::DotSku;

    #[test]
    fn test_partial_positions_encode_asymmetrically() {
        let mut row = Row::new("sku1");
        row.dot_skus = vec![
            DotSku::with_position("a", "50%", "30%"),
            DotSku::with_position("b", "50%", ""),
            DotSku::with_position("c", "", "30%"),
            DotSku::new("d"),
        ];

        let csv = to_csv(&[row]);
        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(data_line, "sku1,,,,a;b;c;d,50%:30%;50%:;:30%;");
    }

    #[test]
    fn test_header_line() {
        assert_eq!(to_csv(&[]), "product_sku,prod_name,url,img,dot_skus,dot_pos");
    }

    #[test]
    fn test_invisible_dots_are_skipped() {
        let mut row = Row::new("sku1");
        row.dot_skus = vec![DotSku::new("  "), DotSku::with_position("a", "1%", "2%")];
        let csv = to_csv(&[row]);
        assert!(csv.lines().nth(1).unwrap().contains(",a,1%:2%"));
    }

    #[test]
    fn test_field_escaping() {
        let mut row = Row::new("sku1");
        row.prod_name = "Sofa, 3-seat \"Lux\"".to_string();
        let csv = to_csv(&[row]);
        assert!(csv.contains("\"Sofa, 3-seat \"\"Lux\"\"\""));
    }
}
