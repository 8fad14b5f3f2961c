//! Export operations for the WASM API
//!
//! Serializes the current row snapshot to the downstream encodings:
//! consolidated CSV text, the `allRecomComboData` script block, and the
//! spreadsheet value grid (plus the ranges for its full-replace write).

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, lock_store, serialize};
use crate::export::{
    clear_range, collect_dot_skus, rows_to_sheet_values, sheet_values_to_rows, to_csv,
    to_script_block, update_range,
};
use crate::wasm_info;

/// Export the current rows as consolidated CSV text.
#[wasm_bindgen(js_name = exportCsv)]
pub fn export_csv() -> Result<String, JsValue> {
    let store = lock_store()?;
    let csv = to_csv(store.rows());
    wasm_info!("exportCsv: {} rows, {} bytes", store.len(), csv.len());
    Ok(csv)
}

/// Unique dot SKUs in the current rows — the SKU set whose storefront
/// URLs the host resolves before a script-block export.
#[wasm_bindgen(js_name = dotSkusForExport)]
pub fn dot_skus_for_export() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(&collect_dot_skus(store.rows()), "Failed to serialize dot SKUs")
}

/// Export the current rows as the script block. `dot_urls_js` maps dot
/// SKU to its resolved storefront URL; dots without an entry simply get
/// no link.
#[wasm_bindgen(js_name = exportScriptBlock)]
pub fn export_script_block(dot_urls_js: JsValue) -> Result<String, JsValue> {
    let dot_urls: HashMap<String, String> =
        deserialize(dot_urls_js, "Failed to deserialize dot URL map")?;
    let store = lock_store()?;
    let block = to_script_block(store.rows(), &dot_urls);
    wasm_info!("exportScriptBlock: {} bytes", block.len());
    Ok(block)
}

// ============================================================================
// Spreadsheet push / pull
// ============================================================================

/// Value grid for a spreadsheet push (header row included).
#[wasm_bindgen(js_name = sheetPushValues)]
pub fn sheet_push_values() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(
        &rows_to_sheet_values(store.rows()),
        "Failed to serialize sheet values",
    )
}

/// Range to clear before the push; sized to wipe stale rows from a
/// previously larger table.
#[wasm_bindgen(js_name = sheetClearRange)]
pub fn sheet_clear_range(sheet_name: String) -> Result<String, JsValue> {
    let store = lock_store()?;
    Ok(clear_range(&sheet_name, store.len() + 1))
}

/// Anchor range for the push rewrite.
#[wasm_bindgen(js_name = sheetUpdateRange)]
pub fn sheet_update_range(sheet_name: String) -> String {
    update_range(&sheet_name)
}

/// Ingest pulled sheet values (header row included) as the new row
/// list. Returns the imported row count.
#[wasm_bindgen(js_name = importSheetValues)]
pub fn import_sheet_values(values_js: JsValue) -> Result<usize, JsValue> {
    let values: Vec<Vec<String>> = deserialize(values_js, "Failed to deserialize sheet values")?;
    let data = if values.is_empty() { &values[..] } else { &values[1..] };
    let rows = sheet_values_to_rows(data);
    let count = rows.len();
    wasm_info!("importSheetValues: {} rows", count);
    lock_store()?.replace_all(rows, None);
    Ok(count)
}
