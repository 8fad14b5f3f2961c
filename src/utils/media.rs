//! Templated media-path notation
//!
//! CMS content references images as `{{media url=<path>}}` and storefront
//! links as `{{store direct_url='<url_key>.html'}}`. Inbound templates are
//! normalized to absolute URLs; outbound links are re-derived from a
//! resolved absolute URL. Both notations must survive a round trip
//! byte-for-byte.

use once_cell::sync::Lazy;
use regex::Regex;

const MEDIA_TEMPLATE_PREFIX: &str = "{{media url=";

/// Catalog image cache segment used by the storefront for product images.
const PRODUCT_IMAGE_CACHE: &str = "catalog/product/cache/912f4218b83600a6f47af6c76f1f9667";

/// Fallback when an URL refuses to split cleanly: grab the last
/// `.html`-terminated path segment.
static URL_KEY_FALLBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/([^/]+)\.html$").expect("url key fallback regex"));

/// Normalize a media value to an absolute URL.
///
/// `{{media url=wysiwyg/image.jpg}}` becomes `<media_url>/wysiwyg/image.jpg`;
/// a plain URL passes through; blank input is `None`.
pub fn parse_media_url(value: &str, media_url: &str) -> Option<String> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(rest) = s.strip_prefix(MEDIA_TEMPLATE_PREFIX) {
        let rest = rest.trim_end();
        let path = rest.strip_suffix("}}").unwrap_or(rest);
        return Some(format!("{}/{}", media_url, path));
    }

    Some(s.to_string())
}

/// Storefront product page URL for a catalog `url_key`.
pub fn product_url(url_key: &str, base_url: &str) -> String {
    format!("{}/{}.html", base_url, url_key)
}

/// Absolute image URL for a catalog image path like `/e/a/example.jpg`.
pub fn product_image_url(image_path: &str, media_url: &str) -> String {
    // Upstream occasionally escapes the path; strip backslashes first.
    let path = image_path.replace('\\', "");
    format!("{}/{}{}", media_url, PRODUCT_IMAGE_CACHE, path)
}

/// Extract the storefront `url_key` from an absolute product URL.
pub fn url_key_from_url(url: &str) -> Option<String> {
    if let Some(scheme_end) = url.find("://") {
        let after_scheme = &url[scheme_end + 3..];
        if let Some(slash) = after_scheme.find('/') {
            let mut path = &after_scheme[slash..];
            if let Some(cut) = path.find(|c| c == '?' || c == '#') {
                path = &path[..cut];
            }
            let trimmed = path.strip_prefix('/').unwrap_or(path);
            let key = trimmed.strip_suffix(".html").unwrap_or(trimmed);
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
        return None;
    }

    URL_KEY_FALLBACK
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Re-wrap a resolved storefront URL in the templated link notation.
///
/// Returns `None` when no url_key can be derived; callers omit the link
/// in that case rather than emitting a broken template.
pub fn store_direct_url(url: &str) -> Option<String> {
    let key = url_key_from_url(url)?;
    Some(format!("{{{{store direct_url='{}.html'}}}}", key))
}
