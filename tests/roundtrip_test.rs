// CSV and sheet round-trip coverage: serialized rows must re-parse to
// the same dot SKUs and (possibly partial) positions.

use combo_editor_wasm::export::{rows_to_sheet_values, sheet_values_to_rows, to_csv};
use combo_editor_wasm::models::core::{DotSku, Row};
use combo_editor_wasm::parse::parse_csv;

/// Rows as the CSV path produces them: names and URLs come from the
/// resolver, so round-trip fixtures keep them empty.
fn fixture_rows() -> Vec<Row> {
    vec![
        Row {
            product_sku: "sku1".to_string(),
            prod_name: String::new(),
            url: String::new(),
            img: Some("https://media.example.com/p/a.jpg".to_string()),
            dot_skus: vec![
                DotSku::with_position("d1", "50%", "30%"),
                DotSku::with_position("d2", "50%", ""),
                DotSku::with_position("d3", "", "30%"),
                DotSku::new("d4"),
            ],
        },
        Row {
            product_sku: "sku2".to_string(),
            prod_name: String::new(),
            url: String::new(),
            img: None,
            dot_skus: vec![DotSku::with_position("d5", "12.34%", "56.78%")],
        },
        Row {
            product_sku: "sku3".to_string(),
            prod_name: String::new(),
            url: String::new(),
            img: None,
            dot_skus: Vec::new(),
        },
    ]
}

#[test]
fn test_csv_roundtrip_preserves_rows() {
    let rows = fixture_rows();
    let reparsed = parse_csv(&to_csv(&rows)).unwrap();
    assert_eq!(reparsed, rows);
}

#[test]
fn test_csv_roundtrip_twice_is_stable() {
    let rows = fixture_rows();
    let once = to_csv(&rows);
    let twice = to_csv(&parse_csv(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn test_unset_position_stays_distinct_from_zero() {
    let rows = vec![Row {
        product_sku: "sku1".to_string(),
        prod_name: String::new(),
        url: String::new(),
        img: None,
        dot_skus: vec![
            DotSku::with_position("zero", "0%", "0%"),
            DotSku::new("unset"),
        ],
    }];

    let reparsed = parse_csv(&to_csv(&rows)).unwrap();
    assert_eq!(reparsed[0].dot_skus[0].top, "0%");
    assert_eq!(reparsed[0].dot_skus[1].top, "");
    assert_eq!(reparsed[0].dot_skus[1].left, "");
}

#[test]
fn test_consolidated_row_with_trailing_empty_position() {
    let csv = "product_sku,prod_name,url,img,dot_skus,dot_pos\n\
               sku1,Product A,,,\"sku2;sku3\",\"50%:30%;:\"\n";
    let rows = parse_csv(csv).unwrap();
    assert_eq!(
        rows[0].dot_skus,
        vec![
            DotSku::with_position("sku2", "50%", "30%"),
            DotSku::with_position("sku3", "", ""),
        ]
    );
}

#[test]
fn test_quoted_name_survives_roundtrip() {
    let mut row = Row::new("sku1");
    row.prod_name = "Sofa, the \"big\" one\nwith newline".to_string();
    row.dot_skus = vec![DotSku::with_position("d", "1%", "2%")];

    let csv = to_csv(std::slice::from_ref(&row));
    // The CSV path drops resolver-owned fields; compare the rest against
    // the sheet path which carries them verbatim.
    let parsed = parse_csv(&csv).unwrap();
    assert_eq!(parsed[0].product_sku, "sku1");
    assert_eq!(parsed[0].dot_skus, row.dot_skus);

    let values = rows_to_sheet_values(std::slice::from_ref(&row));
    let pulled = sheet_values_to_rows(&values[1..]);
    assert_eq!(pulled[0].prod_name, row.prod_name);
}

#[test]
fn test_sheet_roundtrip_preserves_resolver_fields() {
    let mut rows = fixture_rows();
    rows[0].prod_name = "Product A".to_string();
    rows[0].url = "https://shop.example.com/a.html".to_string();

    let values = rows_to_sheet_values(&rows);
    let pulled = sheet_values_to_rows(&values[1..]);
    assert_eq!(pulled, rows);
}
