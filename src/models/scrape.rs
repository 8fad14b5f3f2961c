//! Scrape-result shape
//!
//! The page scraper is an external collaborator; it hands back one
//! result per URL with the marker coordinates it found. The store keeps
//! these for the production viewer without touching edit history.

use serde::{Deserialize, Serialize};

/// A raw marker coordinate pair as read off a live page, e.g. `"52.4%"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DotPoint {
    pub left: String,
    pub top: String,
}

/// Best-effort extraction from one scraped page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub dots: Vec<DotPoint>,
}
