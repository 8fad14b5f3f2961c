//! Shared helpers for WASM API operations
//!
//! Common patterns for serialization, error handling, logging, and
//! access to the module-owned editor state across all API operations.

use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::position::PositionEditor;
use crate::store::RowStore;

// ============================================================================
// Module-owned state (canonical source of truth)
// ============================================================================

lazy_static! {
    pub(crate) static ref STORE: Mutex<RowStore> = Mutex::new(RowStore::new());
    pub(crate) static ref EDITOR: Mutex<PositionEditor> = Mutex::new(PositionEditor::new());
    pub(crate) static ref CONFIG: Mutex<Option<EditorConfig>> = Mutex::new(None);
}

/// Lock the row store for an API operation.
pub(crate) fn lock_store() -> Result<MutexGuard<'static, RowStore>, JsValue> {
    STORE
        .lock()
        .map_err(|_| JsValue::from_str("row store lock poisoned"))
}

/// Lock the position editor for an API operation.
pub(crate) fn lock_editor() -> Result<MutexGuard<'static, PositionEditor>, JsValue> {
    EDITOR
        .lock()
        .map_err(|_| JsValue::from_str("position editor lock poisoned"))
}

/// Current editor configuration; `initConfig` must have run.
pub(crate) fn current_config() -> Result<EditorConfig, JsValue> {
    CONFIG
        .lock()
        .map_err(|_| JsValue::from_str("config lock poisoned"))?
        .clone()
        .ok_or_else(|| JsValue::from_str("editor config not initialized (call initConfig first)"))
}

pub(crate) fn set_config(config: EditorConfig) -> Result<(), JsValue> {
    *CONFIG
        .lock()
        .map_err(|_| JsValue::from_str("config lock poisoned"))? = Some(config);
    Ok(())
}

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

// ============================================================================
// Logging Helper Functions (called by macros)
// ============================================================================

pub fn log_debug(msg: &str) {
    log(&format!("[WASM] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] {}", msg));
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

// ============================================================================
// Timing
// ============================================================================

/// Monotonic timestamp in milliseconds for operation logging. Zero when
/// the Performance API is unavailable.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert a core error into a JsValue, logging it on the way out.
pub fn operation_error(err: impl std::fmt::Display) -> JsValue {
    let msg = err.to_string();
    log_error(&msg);
    JsValue::from_str(&msg)
}
