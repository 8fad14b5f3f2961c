//! Product catalog wire types
//!
//! The upstream catalog service answers a batched SKU lookup with an
//! array whose first element wraps the item list. These types mirror
//! that envelope; every field is defaulted so a sparse payload still
//! deserializes.

use serde::{Deserialize, Serialize};

/// One catalog item from the upstream lookup response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductItem {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url_key: String,
    /// Catalog image path, e.g. `/e/a/example.jpg`.
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListData {
    #[serde(default)]
    pub item_total: u64,
    #[serde(default)]
    pub items: Vec<ProductItem>,
}

/// Top-level envelope; the service returns `[{ data: { items: [...] } }]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsListResponse {
    #[serde(default)]
    pub data: ProductListData,
}

/// Flattened product handed back to the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedProduct {
    pub sku: String,
    pub name: String,
    pub url: String,
    pub image: Option<String>,
}
