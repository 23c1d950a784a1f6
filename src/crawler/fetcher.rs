//! HTTP fetcher implementation
//!
//! This module handles all network access for a scrape:
//! - The [`PageFetcher`] seam the rest of the crate depends on
//! - Building the reqwest client from the scraper settings
//! - Content-type agnostic fetches for robots.txt and sitemaps
//! - HTML page fetches that return the page's anchors
//! - Error classification

use crate::config::ScraperConfig;
use crate::crawler::parser::extract_anchors;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;

/// Source of raw documents and page anchors
///
/// Timeouts, redirects and transport errors are entirely the fetcher's
/// concern; callers see only the resulting [`FetchError`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a document of any content type and returns its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches an HTML page and returns its anchors as absolute URLs, in document order
    async fn fetch_anchors(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```
/// use sitescope::config::ScraperConfig;
/// use sitescope::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(config.max_redirects)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })
    }

    async fn fetch_anchors(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self.get(url).await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            tracing::warn!(
                "Received HTTP 403 Forbidden for {}. This website may be blocking web scrapers",
                url
            );
            return Ok(Vec::new());
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Check Content-Type
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::UnsupportedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        // Relative links resolve against the URL after redirects
        let base_url = response.url().clone();
        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            source: e,
        })?;

        Ok(extract_anchors(&body, &base_url))
    }
}

/// Missing content types are accepted; servers often omit them for HTML
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_redirect() {
        FetchError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}
