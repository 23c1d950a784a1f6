//! URL handling module for Sitescope
//!
//! This module provides input URL validation and domain canonicalization:
//! mapping hosts to their registrable domain so that `www.example.co.uk` and
//! `shop.example.co.uk` compare as the same site.

mod domain;
mod validate;

// Re-export main functions
pub use domain::{extract_host, registrable_domain, same_domain};
pub use validate::validate_input_url;

use ::url::{Position, Url};

/// Canonical domain of a URL's host, if the URL has one
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescope::url::canonical_domain;
///
/// let url = Url::parse("https://blog.example.co.uk/post").unwrap();
/// assert_eq!(canonical_domain(&url), Some("example.co.uk".to_string()));
/// ```
pub fn canonical_domain(url: &Url) -> Option<String> {
    extract_host(url)
        .filter(|host| !host.is_empty())
        .map(|host| registrable_domain(&host))
}

/// The part of a URL robots.txt rules are matched against: path plus query
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescope::url::robots_path;
///
/// let url = Url::parse("https://example.com/search?q=rust#top").unwrap();
/// assert_eq!(robots_path(&url), "/search?q=rust");
/// ```
pub fn robots_path(url: &Url) -> &str {
    &url[Position::BeforePath..Position::AfterQuery]
}
