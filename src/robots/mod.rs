//! Robots.txt handling module
//!
//! This module provides parsing of robots.txt files into an immutable policy,
//! allow/deny and crawl-delay evaluation against that policy, and the cache
//! entry type used by the per-domain policy store.

mod cache;
mod evaluator;
mod parser;
mod pattern;

pub use cache::CachedRobots;
pub use evaluator::{AgentPolicy, PolicyChecker, PolicyEvaluator};
pub use parser::{RobotsPolicy, RuleSet, WILDCARD_AGENT};
pub use pattern::Pattern;

use crate::crawler::PageFetcher;
use url::Url;

/// Builds the robots.txt URL for a domain, keeping the page's scheme and port
///
/// robots.txt is always read from the registrable domain, so every host of a
/// site shares one policy: `blog.example.com` uses `example.com/robots.txt`.
///
/// # Examples
///
/// ```
/// use sitescope::robots::robots_url;
/// use url::Url;
///
/// let page = Url::parse("https://www.example.com:8443/a/b?c=d").unwrap();
/// assert_eq!(
///     robots_url(&page, "example.com").unwrap().as_str(),
///     "https://example.com:8443/robots.txt"
/// );
/// ```
pub fn robots_url(page: &Url, domain: &str) -> Option<Url> {
    let mut url = page.join("/robots.txt").ok()?;
    url.set_host(Some(domain)).ok()?;
    Some(url)
}

/// Fetches and parses robots.txt for a domain
///
/// # Arguments
///
/// * `fetcher` - The page fetcher to use
/// * `page` - Any URL on the target site; supplies the scheme and port
/// * `domain` - The site's registrable domain
///
/// # Returns
///
/// The cache entry for the site. When robots.txt cannot be retrieved the
/// entry is degraded: it allows everything and declares no crawl delay.
pub async fn fetch_robots(fetcher: &dyn PageFetcher, page: &Url, domain: &str) -> CachedRobots {
    let Some(robots_url) = robots_url(page, domain) else {
        tracing::warn!("Cannot build robots.txt URL for {}", page);
        return CachedRobots::degraded();
    };

    tracing::info!("Fetching robots.txt from {}", robots_url);
    match fetcher.fetch(robots_url.as_str()).await {
        Ok(content) => {
            let policy = RobotsPolicy::parse(&content);
            tracing::debug!(
                "Parsed robots.txt: {} groups, {} sitemaps",
                policy.group_count(),
                policy.sitemaps().len()
            );
            CachedRobots::new(PolicyEvaluator::new(policy))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to fetch robots.txt from {}: {}. Allowing all URLs",
                robots_url,
                e
            );
            CachedRobots::degraded()
        }
    }
}
