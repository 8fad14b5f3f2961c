//! Position editing API
//!
//! Runs the placement and drag flows against the module-owned editor
//! machine. Drag moves return local positions for rendering only; the
//! row store sees exactly one mutation per committed position.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, lock_editor, lock_store, operation_error, serialize};
use crate::position::{ImageBox, PositionCommit};
use crate::wasm_log;

/// Enter placement mode for an unplaced dot; the next image click
/// commits its position.
#[wasm_bindgen(js_name = beginPlacement)]
pub fn begin_placement(sku: String) -> Result<(), JsValue> {
    wasm_log!("beginPlacement: {}", sku);
    lock_editor()?.begin_placement(sku);
    Ok(())
}

/// SKU currently awaiting placement, or null.
#[wasm_bindgen(js_name = placementSku)]
pub fn placement_sku() -> Result<Option<String>, JsValue> {
    Ok(lock_editor()?.placement_sku().map(str::to_string))
}

/// Leave placement or drag mode without committing.
#[wasm_bindgen(js_name = cancelPositionEdit)]
pub fn cancel_position_edit() -> Result<(), JsValue> {
    lock_editor()?.cancel();
    Ok(())
}

/// A click on row `row_index`'s image. In placement mode this commits
/// the clicked position (one history entry) and exits the mode; the
/// committed position is returned, or null when no placement was armed.
#[wasm_bindgen(js_name = imageClick)]
pub fn image_click(row_index: usize, x: f64, y: f64, image_box_js: JsValue) -> Result<JsValue, JsValue> {
    let image_box: ImageBox = deserialize(image_box_js, "Failed to deserialize image box")?;
    let commit = lock_editor()?.image_click(x, y, &image_box);

    if let Some(commit) = &commit {
        commit_position(row_index, commit)?;
    }
    serialize(&commit, "Failed to serialize position commit")
}

/// Pointer down on an already-placed dot starts a drag.
#[wasm_bindgen(js_name = beginDotDrag)]
pub fn begin_dot_drag(sku: String, x: f64, y: f64) -> Result<(), JsValue> {
    lock_editor()?.begin_drag(sku, x, y);
    Ok(())
}

/// Pointer move during a drag. Returns the local `[top, left]`
/// percentages for rendering, or null outside a drag. Never mutates the
/// store.
#[wasm_bindgen(js_name = dotDragMove)]
pub fn dot_drag_move(x: f64, y: f64, image_box_js: JsValue) -> Result<JsValue, JsValue> {
    let image_box: ImageBox = deserialize(image_box_js, "Failed to deserialize image box")?;
    let local = lock_editor()?.drag_move(x, y, &image_box);
    serialize(&local, "Failed to serialize drag position")
}

/// Pointer release. Commits the final position only when the pointer
/// travelled past the click/drag threshold; returns whether a commit
/// happened.
#[wasm_bindgen(js_name = endDotDrag)]
pub fn end_dot_drag(row_index: usize, x: f64, y: f64, image_box_js: JsValue) -> Result<bool, JsValue> {
    let image_box: ImageBox = deserialize(image_box_js, "Failed to deserialize image box")?;
    let commit = lock_editor()?.end_drag(x, y, &image_box);

    match commit {
        Some(commit) => {
            commit_position(row_index, &commit)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Direct numeric entry for one dot's position.
#[wasm_bindgen(js_name = setDotPosition)]
pub fn set_dot_position(
    row_index: usize,
    sku: String,
    top: String,
    left: String,
) -> Result<(), JsValue> {
    commit_position(
        row_index,
        &PositionCommit {
            sku,
            top,
            left,
        },
    )
}

/// One discrete store mutation per committed position.
fn commit_position(row_index: usize, commit: &PositionCommit) -> Result<(), JsValue> {
    let mut store = lock_store()?;

    let mut row = store
        .rows()
        .get(row_index)
        .cloned()
        .ok_or_else(|| operation_error(format!("row index {} out of range", row_index)))?;

    if !row.set_dot_position(&commit.sku, &commit.top, &commit.left) {
        return Err(operation_error(format!(
            "dot `{}` not found on row {}",
            commit.sku, row_index
        )));
    }

    wasm_log!(
        "commit position: row={} sku={} top={} left={}",
        row_index,
        commit.sku,
        commit.top,
        commit.left
    );
    store.update_row(row_index, row).map_err(operation_error)
}
