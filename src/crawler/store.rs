//! Per-domain policy caches shared across scrape sessions
//!
//! The store owns the robots.txt and sitemap caches. Entries are created
//! lazily on first access for a domain, handed out as `Arc`s and never
//! mutated afterwards. Two sessions racing on a cold domain may both fetch;
//! whichever entry lands first is kept.

use crate::crawler::PageFetcher;
use crate::robots::{fetch_robots, CachedRobots};
use crate::sitemap::{aggregate, SitemapIndex};
use dashmap::DashMap;
use std::sync::Arc;
use url::Url;

/// Concurrency-safe robots and sitemap caches keyed by canonical domain
#[derive(Debug, Default)]
pub struct PolicyStore {
    robots: DashMap<String, Arc<CachedRobots>>,
    sitemaps: DashMap<String, Arc<SitemapIndex>>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the robots entry for a domain, fetching it on first access
    ///
    /// A cached entry older than 24 hours is replaced by a fresh fetch.
    ///
    /// # Arguments
    ///
    /// * `domain` - Canonical domain of the target
    /// * `page` - The target URL; robots.txt is read from its origin
    /// * `fetcher` - The page fetcher to use
    pub async fn robots(
        &self,
        domain: &str,
        page: &Url,
        fetcher: &dyn PageFetcher,
    ) -> Arc<CachedRobots> {
        // Clone out of the guard so no shard lock is held across the fetch
        let cached = self.robots.get(domain).map(|entry| Arc::clone(entry.value()));
        match cached {
            Some(entry) if !entry.is_stale() => {
                tracing::debug!("Using cached robots.txt for {}", domain);
                return entry;
            }
            Some(_) => {
                tracing::info!("Cached robots.txt for {} is stale, refetching", domain);
                self.robots.remove(domain);
            }
            None => {}
        }

        let fetched = Arc::new(fetch_robots(fetcher, page, domain).await);
        let entry = self
            .robots
            .entry(domain.to_string())
            .or_insert(fetched);
        Arc::clone(entry.value())
    }

    /// Returns the sitemap index for a domain, aggregating it on first access
    ///
    /// # Arguments
    ///
    /// * `domain` - Canonical domain of the target
    /// * `sitemap_urls` - Sitemaps declared by the domain's robots.txt
    /// * `fetcher` - The page fetcher to use
    pub async fn sitemaps(
        &self,
        domain: &str,
        sitemap_urls: &[String],
        fetcher: &dyn PageFetcher,
    ) -> Arc<SitemapIndex> {
        if let Some(entry) = self.sitemaps.get(domain) {
            tracing::debug!("Using cached sitemap index for {}", domain);
            return Arc::clone(entry.value());
        }

        let index = Arc::new(aggregate(sitemap_urls, fetcher).await);
        let entry = self
            .sitemaps
            .entry(domain.to_string())
            .or_insert(index);
        Arc::clone(entry.value())
    }

    /// Number of domains with a cached robots entry
    pub fn robots_len(&self) -> usize {
        self.robots.len()
    }

    /// Number of domains with a cached sitemap index
    pub fn sitemaps_len(&self) -> usize {
        self.sitemaps.len()
    }

    /// Drops every cached entry
    pub fn clear(&self) {
        self.robots.clear();
        self.sitemaps.clear();
    }
}
