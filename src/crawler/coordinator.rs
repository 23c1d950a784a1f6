//! Scrape coordinator - single-page scrape orchestration
//!
//! A scrape session runs strictly in sequence:
//! - Validating the input URL before any network access
//! - Resolving the domain's robots policy and crawl delay
//! - Waiting out the crawl delay
//! - Aggregating the domain's sitemaps
//! - Fetching the page and filtering its links

use crate::config::ScraperConfig;
use crate::crawler::discovery::LinkDiscoveryEngine;
use crate::crawler::{DelayOutcome, HttpFetcher, PageFetcher, PolicyStore, Sleeper, TokioSleeper};
use crate::output::ScrapedPage;
use crate::url::{canonical_domain, robots_path, validate_input_url};
use crate::{ScopeError, UrlError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scalar inputs the scrape consumes from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Group name looked up in robots.txt
    pub robots_token: String,

    /// Crawl delay used when robots.txt declares none
    pub default_crawl_delay: Duration,
}

impl ScrapeSettings {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            robots_token: config.robots_token(),
            default_crawl_delay: Duration::from_millis(config.default_crawl_delay_ms),
        }
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

/// Outcome of one scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    /// The target page with its discovered links
    pub page: ScrapedPage,

    /// True when robots.txt could not be fetched and allow-all was applied
    pub robots_degraded: bool,

    /// The crawl delay that was observed before fetching the page
    pub crawl_delay: Duration,

    /// Number of URLs declared by the domain's sitemaps
    pub sitemap_urls: usize,

    /// True when robots.txt disallows the target URL itself
    pub disallowed: bool,

    /// True when the crawl-delay wait was cancelled
    pub cancelled: bool,
}

impl ScrapeReport {
    fn new(url: &str, robots_degraded: bool, crawl_delay: Duration) -> Self {
        Self {
            page: ScrapedPage::leaf(url),
            robots_degraded,
            crawl_delay,
            sitemap_urls: 0,
            disallowed: false,
            cancelled: false,
        }
    }

    /// The discovered link URLs, in discovery order
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.page.links.iter().map(|link| link.url.as_str())
    }
}

/// Scrapes single pages under the site's crawl policy
///
/// The scraper is cheap to share: the policy store behind it may serve many
/// concurrent sessions, each of which is sequential.
pub struct Scraper {
    fetcher: Arc<dyn PageFetcher>,
    sleeper: Arc<dyn Sleeper>,
    store: Arc<PolicyStore>,
    settings: ScrapeSettings,
}

impl Scraper {
    /// Creates a scraper with its own empty policy store
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        sleeper: Arc<dyn Sleeper>,
        settings: ScrapeSettings,
    ) -> Self {
        Self {
            fetcher,
            sleeper,
            store: Arc::new(PolicyStore::new()),
            settings,
        }
    }

    /// Creates an HTTP scraper from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    /// * `cancel` - Token that interrupts the crawl-delay wait
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to scrape
    /// * `Err(ScopeError)` - The HTTP client could not be built
    pub fn from_config(
        config: &ScraperConfig,
        cancel: CancellationToken,
    ) -> Result<Self, ScopeError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(TokioSleeper::new(cancel)),
            ScrapeSettings::from_config(config),
        ))
    }

    /// Shares an existing policy store (builder pattern)
    pub fn with_store(mut self, store: Arc<PolicyStore>) -> Self {
        self.store = store;
        self
    }

    /// Returns the policy store backing this scraper
    pub fn store(&self) -> &Arc<PolicyStore> {
        &self.store
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    /// Scrapes one page
    ///
    /// Only an invalid input URL and a failed target page fetch are errors.
    /// A missing robots.txt degrades to allow-all, unreadable sitemaps
    /// contribute no URLs, and a cancelled crawl delay or a disallowed target
    /// yields the root page without links.
    ///
    /// # Arguments
    ///
    /// * `raw_url` - The page to scrape, as typed by the user
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - The page and its allowed same-domain links
    /// * `Err(ScopeError)` - Invalid input or the page could not be fetched
    pub async fn scrape(&self, raw_url: &str) -> Result<ScrapeReport, ScopeError> {
        let url = validate_input_url(raw_url)?;
        let domain = canonical_domain(&url).ok_or(UrlError::MissingHost)?;
        let token = self.settings.robots_token.as_str();
        let fetcher = self.fetcher.as_ref();

        tracing::info!("Scraping {} (domain {})", url, domain);

        let robots = self.store.robots(&domain, &url, fetcher).await;
        let evaluator = &robots.evaluator;
        let crawl_delay = evaluator.crawl_delay(token, self.settings.default_crawl_delay);
        let mut report = ScrapeReport::new(url.as_str(), robots.degraded, crawl_delay);

        if robots.degraded {
            tracing::warn!(
                "No usable robots.txt for {}, allowing all paths with a {}ms delay",
                domain,
                crawl_delay.as_millis()
            );
        }

        if !evaluator.is_allowed(robots_path(&url), token) {
            tracing::warn!("URL {} is disallowed by robots.txt. Skipping", url);
            report.disallowed = true;
            return Ok(report);
        }

        if !crawl_delay.is_zero() {
            tracing::info!("Waiting {}ms before fetching {}", crawl_delay.as_millis(), url);
        }
        if self.sleeper.sleep(crawl_delay).await == DelayOutcome::Cancelled {
            tracing::info!("Scrape of {} cancelled during crawl delay", url);
            report.cancelled = true;
            return Ok(report);
        }

        let sitemaps = self
            .store
            .sitemaps(&domain, evaluator.policy().sitemaps(), fetcher)
            .await;
        report.sitemap_urls = sitemaps.len();

        let anchors = fetcher.fetch_anchors(url.as_str()).await?;
        tracing::debug!("Found {} anchors on {}", anchors.len(), url);

        let checker = evaluator.for_agent(token);
        let links = LinkDiscoveryEngine::new(&domain, &checker).discover(&anchors, &sitemaps);
        tracing::info!("Discovered {} links on {}", links.len(), url);

        report.page = ScrapedPage::with_links(url.as_str(), links);
        Ok(report)
    }
}
