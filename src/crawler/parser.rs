//! HTML parser for extracting page anchors
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` tags anywhere in the document, in document order
//!
//! **Exclude:**
//! - Empty hrefs and fragment-only links (same page anchors)
//! - `javascript:`, `mailto:`, `tel:` links
//! - Data URIs
//! - Anything that is not HTTP(S) after resolution
//!
//! Duplicates are kept; deduplication happens during link discovery.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all anchors from an HTML document as absolute URLs
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// The absolute URLs of every usable `<a href>` in document order
///
/// # Example
///
/// ```
/// use sitescope::crawler::extract_anchors;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_anchors(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_anchors(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty hrefs
    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::debug!("Skipping unresolvable href {:?}: {}", href, e);
            None
        }
    }
}
