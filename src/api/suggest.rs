//! Position suggestion API
//!
//! The host talks to the vision service and hands the per-candidate
//! replies (or error bodies) back here; this module owns the response
//! contract and applies the outcomes to a row in one mutation.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, lock_store, operation_error, serialize};
use crate::suggest::{apply_suggestions, extract_retry_delay, parse_position_reply, PositionSuggestion};
use crate::wasm_info;

/// Extract a `{ top, left }` position from a free-text reply, or null
/// when either axis is missing.
#[wasm_bindgen(js_name = parsePositionReply)]
pub fn parse_position_reply_js(reply: String) -> Result<JsValue, JsValue> {
    serialize(&parse_position_reply(&reply), "Failed to serialize position")
}

/// Pull the rate-limit retry hint out of an upstream error body, if any.
#[wasm_bindgen(js_name = extractRetryDelay)]
pub fn extract_retry_delay_js(error_text: String) -> Option<String> {
    extract_retry_delay(&error_text)
}

/// Apply one round of suggestions (`[{ sku, position?, retry_delay? }]`)
/// to the row at `row_index`. Only dots with a suggested position move;
/// returns `{ fail_count, retry_delay? }` so the caller can decide
/// between retrying and reporting.
#[wasm_bindgen(js_name = applyPositionSuggestions)]
pub fn apply_position_suggestions(
    row_index: usize,
    suggestions_js: JsValue,
) -> Result<JsValue, JsValue> {
    let suggestions: Vec<PositionSuggestion> =
        deserialize(suggestions_js, "Failed to deserialize suggestions")?;

    let mut store = lock_store()?;
    let row = store
        .rows()
        .get(row_index)
        .cloned()
        .ok_or_else(|| operation_error(format!("row index {} out of range", row_index)))?;

    let (updated, summary) = apply_suggestions(&row, &suggestions);
    wasm_info!(
        "applyPositionSuggestions: row={} candidates={} failed={}",
        row_index,
        suggestions.len(),
        summary.fail_count
    );
    store.update_row(row_index, updated).map_err(operation_error)?;

    serialize(&summary, "Failed to serialize suggestion summary")
}
