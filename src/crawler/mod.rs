//! Crawler module for single-page scraping
//!
//! This module contains the scrape pipeline, including:
//! - The page fetcher seam and its HTTP implementation
//! - HTML anchor extraction
//! - Crawl-delay waiting with cancellation
//! - The per-domain robots and sitemap caches
//! - Link discovery and overall scrape coordination

mod coordinator;
mod delay;
mod discovery;
mod fetcher;
mod parser;
mod store;

pub use coordinator::{ScrapeReport, ScrapeSettings, Scraper};
pub use delay::{DelayOutcome, Sleeper, TokioSleeper};
pub use discovery::{LinkDiscoveryEngine, LinkRecord, SkipCounts};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use parser::extract_anchors;
pub use store::PolicyStore;

use crate::config::ScraperConfig;
use crate::ScopeError;
use tokio_util::sync::CancellationToken;

/// Scrapes a single page over HTTP
///
/// This is the main entry point for a one-off scrape. It will:
/// 1. Validate the URL
/// 2. Fetch and evaluate the site's robots.txt
/// 3. Wait out the crawl delay
/// 4. Merge the URLs declared in the site's sitemaps
/// 5. Fetch the page and filter its links
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `url` - The page to scrape
/// * `cancel` - Token that interrupts the crawl-delay wait
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - Scrape completed
/// * `Err(ScopeError)` - Invalid input or the page could not be fetched
pub async fn scrape(
    config: &ScraperConfig,
    url: &str,
    cancel: CancellationToken,
) -> Result<ScrapeReport, ScopeError> {
    Scraper::from_config(config, cancel)?.scrape(url).await
}
