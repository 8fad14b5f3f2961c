//! WASM build test
//!
//! Exercises the module-owned store through the JS-facing API the way
//! the host UI does. Runs under `wasm-pack test` only.

#![cfg(target_arch = "wasm32")]

use combo_editor_wasm::api;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_config_and_import() {
    api::init_config(
        "https://shop.example.com".to_string(),
        "https://media.example.com".to_string(),
    )
    .unwrap();

    let count = api::import_combo_text(
        "[{sku: 'A', img: '{{media url=p/a.jpg}}', dots: [{sku: 'B', top: '', left: ''}]}]"
            .to_string(),
    )
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(api::row_count().unwrap(), 1);
}

#[wasm_bindgen_test]
fn test_position_edit_and_undo() {
    api::init_config(
        "https://shop.example.com".to_string(),
        "https://media.example.com".to_string(),
    )
    .unwrap();
    api::import_combo_text("[{sku: 'M', dots: [{sku: 'D', top: '', left: ''}]}]".to_string())
        .unwrap();

    api::set_dot_position(0, "D".to_string(), "10.00%".to_string(), "20.00%".to_string()).unwrap();
    assert!(api::can_undo().unwrap());

    let step = api::undo().unwrap();
    assert!(!step.is_null());
}

#[wasm_bindgen_test]
fn test_export_csv_header() {
    api::init_config(
        "https://shop.example.com".to_string(),
        "https://media.example.com".to_string(),
    )
    .unwrap();
    api::clear_rows().unwrap();

    let csv = api::export_csv().unwrap();
    assert!(csv.starts_with("product_sku,prod_name,url,img,dot_skus,dot_pos"));
}
