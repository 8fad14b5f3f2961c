//! Product Combo Editor WASM Module
//!
//! This is the editor core for the product-combo admin tool. It owns
//! combo-data parsing (CSV, HTML-embedded script arrays, raw JS
//! literals), the versioned row store with undo/redo, dot position math,
//! and the export serializers. The interactive UI and all network I/O
//! live in the JavaScript host.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod parse;
pub mod position;
pub mod resolver;
pub mod store;
pub mod suggest;
pub mod utils;

// Re-export commonly used types
pub use config::EditorConfig;
pub use error::{ParseError, ValidationError};
pub use models::core::*;
pub use store::{History, HistoryEntry, RowStore, UndoStep};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Combo Editor WASM module initialized");
}
