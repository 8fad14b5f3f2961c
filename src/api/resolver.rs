//! Metadata resolver API
//!
//! The JS host performs the actual catalog fetch; this module builds the
//! batched request, decodes the response, and applies the metadata to
//! the store as a single mutation. Payload problems downgrade to empty
//! mappings — an import with partial data beats no import.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{current_config, deserialize, lock_store, serialize};
use crate::resolver::{
    apply_metadata, build_lookup_request, parse_lookup_response, simplified_products,
};
use crate::wasm_info;

/// Build the batched lookup request for an explicit SKU list
/// (deduplicated, one page of at most 100).
#[wasm_bindgen(js_name = buildProductLookupRequest)]
pub fn build_product_lookup_request(skus_js: JsValue) -> Result<JsValue, JsValue> {
    let skus: Vec<String> = deserialize(skus_js, "Failed to deserialize SKU list")?;
    let request = build_lookup_request(skus);
    serialize(&request, "Failed to serialize lookup request")
}

/// Build the lookup request covering the store's current product SKUs.
#[wasm_bindgen(js_name = productLookupRequestForRows)]
pub fn product_lookup_request_for_rows() -> Result<JsValue, JsValue> {
    let skus: Vec<String> = {
        let store = lock_store()?;
        store
            .rows()
            .iter()
            .map(|row| row.product_sku.clone())
            .collect()
    };
    let request = build_lookup_request(skus);
    serialize(&request, "Failed to serialize lookup request")
}

/// Decode a lookup response into the flattened product list for the
/// host UI (dot images, single-product refresh). Never fails; an
/// unrecognized payload is an empty list.
#[wasm_bindgen(js_name = parseProducts)]
pub fn parse_products(response_json: String) -> Result<JsValue, JsValue> {
    let config = current_config()?;
    let products = simplified_products(&response_json, &config);
    serialize(&products, "Failed to serialize products")
}

/// Backfill row names and URLs from a lookup response, as one undoable
/// store mutation.
#[wasm_bindgen(js_name = applyProductMetadata)]
pub fn apply_product_metadata(response_json: String) -> Result<(), JsValue> {
    let config = current_config()?;
    let metadata = parse_lookup_response(&response_json, &config);

    let mut store = lock_store()?;
    let enriched = apply_metadata(store.rows(), &metadata);
    wasm_info!(
        "applyProductMetadata: {} rows, {} names resolved",
        enriched.len(),
        metadata.sku_to_name.len()
    );
    store.replace_all(enriched, None);
    Ok(())
}
