//! Core API: configuration, imports, and row store operations
//!
//! The WASM module owns the canonical row sequence and its history; the
//! host UI mutates state only through these functions and re-renders
//! from `getRows` / the returned snapshots.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{
    current_config, deserialize, lock_store, operation_error, serialize, set_config,
};
use crate::config::EditorConfig;
use crate::models::core::{normalize_image, DotSku, Row};
use crate::models::scrape::ScrapeResult;
use crate::parse::{parse, FormatHint};
use crate::{wasm_info, wasm_log};

/// Set the storefront and media base URLs. Must run before any import
/// or resolver operation.
#[wasm_bindgen(js_name = initConfig)]
pub fn init_config(base_url: String, media_url: String) -> Result<(), JsValue> {
    let config = EditorConfig::new(&base_url, &media_url).map_err(operation_error)?;
    wasm_info!("initConfig: base={} media={}", config.base_url, config.media_url);
    set_config(config)
}

// ============================================================================
// Import operations
// ============================================================================

fn import_with_hint(text: &str, hint: FormatHint) -> Result<usize, JsValue> {
    let started = crate::api::helpers::now_ms();
    let config = current_config()?;
    let rows = parse(text, hint, &config).map_err(operation_error)?;
    let count = rows.len();
    lock_store()?.replace_all(rows, None);
    wasm_info!(
        "import: {} rows in {:.1}ms",
        count,
        crate::api::helpers::now_ms() - started
    );
    Ok(count)
}

/// Import combo data, probing the encoding (CSV, embedded script, raw
/// array literal). Returns the imported row count.
#[wasm_bindgen(js_name = importData)]
pub fn import_data(text: String) -> Result<usize, JsValue> {
    import_with_hint(&text, FormatHint::Auto)
}

/// Import CSV text. Structural malformation fails the whole import and
/// leaves the store untouched.
#[wasm_bindgen(js_name = importCsv)]
pub fn import_csv(text: String) -> Result<usize, JsValue> {
    import_with_hint(&text, FormatHint::Csv)
}

/// Import HTML/JS combo text (script blocks or a bare array literal).
#[wasm_bindgen(js_name = importComboText)]
pub fn import_combo_text(text: String) -> Result<usize, JsValue> {
    import_with_hint(&text, FormatHint::Script)
}

// ============================================================================
// Row store operations
// ============================================================================

/// Replace the whole row list with host-held rows (one history entry).
#[wasm_bindgen(js_name = loadRows)]
pub fn load_rows(rows_js: JsValue) -> Result<(), JsValue> {
    let rows: Vec<Row> = deserialize(rows_js, "Failed to deserialize rows")?;
    wasm_log!("loadRows: {} rows", rows.len());
    lock_store()?.replace_all(rows, None);
    Ok(())
}

/// Current row snapshot.
#[wasm_bindgen(js_name = getRows)]
pub fn get_rows() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(&store.rows().to_vec(), "Failed to serialize rows")
}

#[wasm_bindgen(js_name = rowCount)]
pub fn row_count() -> Result<usize, JsValue> {
    Ok(lock_store()?.len())
}

/// Author a new main product row.
///
/// Validation happens before any mutation: the trimmed SKU must be
/// non-empty and unique in the current snapshot. Dot SKU inputs keep
/// their authored order; blanks are kept as placeholders to fill in
/// later. Returns the new row's index.
#[wasm_bindgen(js_name = addMainProduct)]
pub fn add_main_product(
    sku: String,
    image: String,
    dot_skus_js: JsValue,
) -> Result<usize, JsValue> {
    let dot_inputs: Vec<String> = deserialize(dot_skus_js, "Failed to deserialize dot SKUs")?;

    let row = Row {
        product_sku: sku,
        prod_name: String::new(),
        url: String::new(),
        img: normalize_image(&image),
        dot_skus: dot_inputs
            .iter()
            .map(|input| DotSku::new(input.trim()))
            .collect(),
    };

    let index = lock_store()?.add_row(row).map_err(operation_error)?;
    wasm_info!("addMainProduct: index={}", index);
    Ok(index)
}

/// Replace one row.
#[wasm_bindgen(js_name = updateRow)]
pub fn update_row(index: usize, row_js: JsValue) -> Result<(), JsValue> {
    let row: Row = deserialize(row_js, "Failed to deserialize row")?;
    lock_store()?.update_row(index, row).map_err(operation_error)
}

/// Delete one row, shifting the rest down.
#[wasm_bindgen(js_name = deleteRow)]
pub fn delete_row(index: usize) -> Result<(), JsValue> {
    lock_store()?.delete_row(index).map_err(operation_error)
}

/// Clear all rows (undoable, like any other mutation).
#[wasm_bindgen(js_name = clearRows)]
pub fn clear_rows() -> Result<(), JsValue> {
    lock_store()?.clear();
    Ok(())
}

// ============================================================================
// Undo / redo
// ============================================================================

/// Step back one mutation. Returns `{ affected_index }` for the UI to
/// scroll to, or null when there was nothing to undo.
#[wasm_bindgen]
pub fn undo() -> Result<JsValue, JsValue> {
    let step = lock_store()?.undo();
    wasm_log!("undo: {:?}", step);
    serialize(&step, "Failed to serialize undo result")
}

/// Step forward one undone mutation.
#[wasm_bindgen]
pub fn redo() -> Result<JsValue, JsValue> {
    let step = lock_store()?.redo();
    wasm_log!("redo: {:?}", step);
    serialize(&step, "Failed to serialize redo result")
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    Ok(lock_store()?.can_undo())
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    Ok(lock_store()?.can_redo())
}

/// Forget all history without touching the current rows.
#[wasm_bindgen(js_name = clearHistory)]
pub fn clear_history() -> Result<(), JsValue> {
    lock_store()?.clear_history();
    Ok(())
}

// ============================================================================
// Scrape results (production viewer; outside edit history)
// ============================================================================

#[wasm_bindgen(js_name = setScrapeResults)]
pub fn set_scrape_results(results_js: JsValue) -> Result<(), JsValue> {
    let results: Vec<ScrapeResult> =
        deserialize(results_js, "Failed to deserialize scrape results")?;
    wasm_log!("setScrapeResults: {} results", results.len());
    lock_store()?.set_scrape_results(results);
    Ok(())
}

#[wasm_bindgen(js_name = getScrapeResults)]
pub fn get_scrape_results() -> Result<JsValue, JsValue> {
    let store = lock_store()?;
    serialize(
        &store.scrape_results().to_vec(),
        "Failed to serialize scrape results",
    )
}

#[wasm_bindgen(js_name = clearScrapeResults)]
pub fn clear_scrape_results() -> Result<(), JsValue> {
    lock_store()?.clear_scrape_results();
    Ok(())
}
