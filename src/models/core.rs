//! Core data structures for the combo editor
//!
//! A `Row` is one main product plus the overlay markers ("dots") placed
//! over its image. Field names match the wire shape the host UI already
//! speaks (`product_sku`, `prod_name`, `url`, `img`, `dot_skus`) so rows
//! round-trip through the API boundary unchanged.

use serde::{Deserialize, Serialize};

/// One overlay marker linked to a main product row.
///
/// `top` and `left` are stored as authored strings ("50%", "50", or "").
/// Empty means unplaced; an unset coordinate is a distinct state from
/// `"0%"` and is never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DotSku {
    pub sku: String,
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub left: String,
}

impl DotSku {
    /// Create an unplaced dot for `sku`.
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            top: String::new(),
            left: String::new(),
        }
    }

    pub fn with_position(sku: impl Into<String>, top: impl Into<String>, left: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            top: top.into(),
            left: left.into(),
        }
    }

    /// A dot is visible once it has a non-empty SKU.
    pub fn is_visible(&self) -> bool {
        !self.sku.trim().is_empty()
    }

    /// At least one coordinate has been set.
    pub fn has_position(&self) -> bool {
        !self.top.is_empty() || !self.left.is_empty()
    }

    /// Both coordinates have been set.
    pub fn is_placed(&self) -> bool {
        !self.top.is_empty() && !self.left.is_empty()
    }
}

/// One "main product" combo entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Main product SKU. May be empty while a row is being authored.
    pub product_sku: String,
    #[serde(default)]
    pub prod_name: String,
    /// Storefront link, derived from the catalog lookup, not authored.
    #[serde(default)]
    pub url: String,
    /// Absolute image URL. `None` means intentionally absent.
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub dot_skus: Vec<DotSku>,
}

impl Row {
    pub fn new(product_sku: impl Into<String>) -> Self {
        Self {
            product_sku: product_sku.into(),
            ..Default::default()
        }
    }

    /// Dots that carry a SKU, in authored order.
    pub fn visible_dots(&self) -> impl Iterator<Item = &DotSku> {
        self.dot_skus.iter().filter(|dot| dot.is_visible())
    }

    /// Set the position of the first dot matching `sku`.
    ///
    /// Returns false (leaving the row untouched) when no dot matches.
    pub fn set_dot_position(&mut self, sku: &str, top: &str, left: &str) -> bool {
        match self.dot_skus.iter_mut().find(|dot| dot.sku == sku) {
            Some(dot) => {
                dot.top = top.to_string();
                dot.left = left.to_string();
                true
            }
            None => false,
        }
    }
}

/// Normalize an optional image value: blank collapses to `None`.
pub fn normalize_image(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
