//! Product metadata resolver
//!
//! Batches SKU lookups against the catalog service and backfills display
//! name, storefront URL, and image for rows that lack them. The resolver
//! never fails: any transport or payload problem downgrades to empty
//! mappings plus one logged warning, and the caller proceeds with
//! partial data.
//!
//! A single request covers the full SKU set (upstream page size 100; the
//! caller chunks beyond that). The transport itself is behind the
//! [`ProductLookup`] seam — in the WASM deployment the JS host performs
//! the fetch and hands back the response text.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::EditorConfig;
use crate::models::core::Row;
use crate::models::products::{ProductsListResponse, SimplifiedProduct};
use crate::utils::media::{product_image_url, product_url};

/// Fields requested from the catalog service.
pub const LOOKUP_FIELDS: &str = "sku,name,url_key,image";

/// Upstream page size; requests are bounded to one page.
pub const LOOKUP_PAGE_SIZE: u32 = 100;

/// Batched catalog lookup request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupRequest {
    pub skus: Vec<String>,
    pub fields: String,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

/// Build the single batched request: SKUs trimmed, empties removed,
/// duplicates collapsed (first occurrence wins the ordering).
pub fn build_lookup_request(skus: impl IntoIterator<Item = String>) -> LookupRequest {
    let mut seen = Vec::new();
    for sku in skus {
        let sku = sku.trim().to_string();
        if sku.is_empty() || seen.contains(&sku) {
            continue;
        }
        seen.push(sku);
    }

    LookupRequest {
        skus: seen,
        fields: LOOKUP_FIELDS.to_string(),
        page: 1,
        page_size: LOOKUP_PAGE_SIZE,
    }
}

/// SKU-keyed mappings resolved from one lookup. A SKU absent upstream is
/// simply absent from the maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMetadata {
    pub sku_to_name: HashMap<String, String>,
    pub sku_to_url: HashMap<String, String>,
    pub sku_to_image: HashMap<String, Option<String>>,
}

impl ProductMetadata {
    pub fn is_empty(&self) -> bool {
        self.sku_to_name.is_empty() && self.sku_to_url.is_empty() && self.sku_to_image.is_empty()
    }
}

/// Transport seam for the catalog service.
pub trait ProductLookup {
    fn fetch(&self, request: &LookupRequest) -> Result<String, String>;
}

/// Resolve metadata for a SKU set. Never fails; see module docs.
pub fn resolve(
    lookup: &impl ProductLookup,
    skus: impl IntoIterator<Item = String>,
    config: &EditorConfig,
) -> ProductMetadata {
    let request = build_lookup_request(skus);
    if request.skus.is_empty() {
        return ProductMetadata::default();
    }

    match lookup.fetch(&request) {
        Ok(body) => parse_lookup_response(&body, config),
        Err(err) => {
            log::warn!("product lookup failed: {}", err);
            ProductMetadata::default()
        }
    }
}

/// Decode the lookup envelope (`[{ data: { items: [...] } }]`; a bare
/// object is tolerated) into the SKU maps. Malformed payloads yield
/// empty maps plus a warning, never an error.
pub fn parse_lookup_response(json: &str, config: &EditorConfig) -> ProductMetadata {
    let response = match decode_envelope(json) {
        Some(response) => response,
        None => {
            log::warn!("product lookup returned an unrecognized payload");
            return ProductMetadata::default();
        }
    };

    let mut metadata = ProductMetadata::default();
    for item in &response.data.items {
        if item.sku.is_empty() {
            continue;
        }
        if !item.name.is_empty() {
            metadata
                .sku_to_name
                .insert(item.sku.clone(), item.name.clone());
        }
        if !item.url_key.is_empty() {
            metadata
                .sku_to_url
                .insert(item.sku.clone(), product_url(&item.url_key, &config.base_url));
        }
        let image = if item.image.is_empty() {
            None
        } else {
            Some(product_image_url(&item.image, &config.media_url))
        };
        metadata.sku_to_image.insert(item.sku.clone(), image);
    }
    metadata
}

/// Flatten a lookup response for the host UI.
pub fn simplified_products(json: &str, config: &EditorConfig) -> Vec<SimplifiedProduct> {
    let metadata = parse_lookup_response(json, config);
    let Some(response) = decode_envelope(json) else {
        return Vec::new();
    };

    response
        .data
        .items
        .iter()
        .filter(|item| !item.sku.is_empty())
        .map(|item| SimplifiedProduct {
            sku: item.sku.clone(),
            name: item.name.clone(),
            url: metadata.sku_to_url.get(&item.sku).cloned().unwrap_or_default(),
            image: metadata.sku_to_image.get(&item.sku).cloned().flatten(),
        })
        .collect()
}

fn decode_envelope(json: &str) -> Option<ProductsListResponse> {
    if let Ok(mut batches) = serde_json::from_str::<Vec<ProductsListResponse>>(json) {
        if batches.is_empty() {
            return None;
        }
        return Some(batches.remove(0));
    }
    serde_json::from_str::<ProductsListResponse>(json).ok()
}

/// Backfill `prod_name` and `url` from resolved metadata. Rows without a
/// product SKU pass through untouched; images are left alone (they come
/// from the authored data, not the catalog). Idempotent.
pub fn apply_metadata(rows: &[Row], metadata: &ProductMetadata) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            if row.product_sku.is_empty() {
                return row.clone();
            }
            let mut enriched = row.clone();
            enriched.prod_name = metadata
                .sku_to_name
                .get(&row.product_sku)
                .cloned()
                .unwrap_or_default();
            enriched.url = metadata
                .sku_to_url
                .get(&row.product_sku)
                .cloned()
                .unwrap_or_default();
            enriched
        })
        .collect()
}
