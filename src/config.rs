//! Validated editor configuration
//!
//! The storefront and media base URLs are injected once by the JS host
//! (`initConfig`) and validated at construction, mirroring the original
//! `frontend-config.ts` startup check. Pure modules take `&EditorConfig`
//! rather than reading globals.

/// Storefront and media base URLs for the current editor session.
///
/// Both fields are absolute origins without a trailing slash; callers
/// concatenate paths directly (`{base_url}/{url_key}.html`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Storefront origin, e.g. `https://shop.example.com`.
    pub base_url: String,
    /// Media/CDN origin, e.g. `https://media.example.com`.
    pub media_url: String,
}

impl EditorConfig {
    /// Construct a validated configuration.
    ///
    /// Each URL is trimmed of surrounding whitespace and any trailing
    /// slash. Both must be non-empty absolute `http(s)` URLs, otherwise
    /// construction fails with a human-readable message.
    pub fn new(base_url: &str, media_url: &str) -> Result<EditorConfig, String> {
        Ok(EditorConfig {
            base_url: validate_url("base_url", base_url)?,
            media_url: validate_url("media_url", media_url)?,
        })
    }
}

/// Validate and normalize a single base URL.
fn validate_url(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!(
            "{} must be an absolute http(s) URL, got `{}`",
            field, trimmed
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
