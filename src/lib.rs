//! Sitescope: a polite single-page link scraper
//!
//! This crate fetches one web page and returns the outbound links that stay on
//! the page's registrable domain and that the site's robots.txt allows, merged
//! with the URLs the site declares in its sitemaps.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod url;

use thiserror::Error;

/// Main error type for Sitescope operations
///
/// Only input validation and the target page fetch abort a scrape; every
/// other failure is recovered inside the crate and never reaches this type.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Failed to fetch page: {0}")]
    PageFetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL must use http or https, got: {0}")]
    InvalidScheme(String),

    #[error("URL must contain a host name")]
    MissingHost,
}

/// Errors raised by a page fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Unsupported content type '{content_type}' for {url}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Result type alias for Sitescope operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ScrapeReport, Scraper};
pub use robots::{PolicyEvaluator, RobotsPolicy};
pub use crate::url::{registrable_domain, same_domain, validate_input_url};
