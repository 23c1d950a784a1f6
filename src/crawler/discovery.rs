//! Link discovery
//!
//! Combines a page's anchors with the domain's sitemap URLs and keeps the ones
//! that stay on the target domain and that the crawl policy allows. Discovery
//! is one level deep: discovered links are returned, never followed.

use crate::robots::PolicyChecker;
use crate::sitemap::SitemapIndex;
use crate::url::{registrable_domain, robots_path};
use std::collections::HashSet;
use url::Url;

/// A candidate URL that passed parsing, with its canonical domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// The URL exactly as discovered
    pub url: String,

    /// Registrable domain of the URL's host
    pub domain: String,
}

/// Why a candidate was dropped
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipCounts {
    /// Empty, unparsable or host-less candidates
    pub invalid: usize,

    /// Candidates on another registrable domain
    pub off_domain: usize,

    /// Candidates robots.txt forbids
    pub disallowed: usize,

    /// Repeats of an already kept URL
    pub duplicate: usize,
}

/// Filters candidate links against a target domain and a crawl policy
pub struct LinkDiscoveryEngine<'a> {
    target_domain: String,
    checker: &'a dyn PolicyChecker,
}

impl<'a> LinkDiscoveryEngine<'a> {
    /// Creates an engine for one target domain
    ///
    /// # Arguments
    ///
    /// * `target_domain` - The registrable domain links must belong to
    /// * `checker` - The policy deciding whether a path may be fetched
    pub fn new(target_domain: &str, checker: &'a dyn PolicyChecker) -> Self {
        Self {
            target_domain: target_domain.trim().to_lowercase(),
            checker,
        }
    }

    /// Discovers the allowed same-domain links
    ///
    /// # Ordering
    ///
    /// Kept anchors come first in document order, followed by sitemap URLs not
    /// already present, in the index's iteration order. Every URL appears once
    /// (exact string comparison).
    ///
    /// # Arguments
    ///
    /// * `anchors` - Absolute anchor URLs from the page, in document order
    /// * `sitemap_urls` - The domain's sitemap index
    ///
    /// # Returns
    ///
    /// The unique, allowed, same-domain URLs
    pub fn discover(&self, anchors: &[String], sitemap_urls: &SitemapIndex) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut skipped = SkipCounts::default();

        let candidates = anchors.iter().chain(sitemap_urls.iter());
        for candidate in candidates {
            if seen.contains(candidate.as_str()) {
                skipped.duplicate += 1;
                continue;
            }

            match self.evaluate(candidate) {
                Ok(record) => {
                    seen.insert(candidate.as_str());
                    result.push(record.url);
                }
                Err(reason) => reason.count(&mut skipped),
            }
        }

        tracing::debug!(
            "Discovered {} links for {} (skipped: {} invalid, {} off-domain, {} disallowed, {} duplicate)",
            result.len(),
            self.target_domain,
            skipped.invalid,
            skipped.off_domain,
            skipped.disallowed,
            skipped.duplicate
        );

        result
    }

    fn evaluate(&self, candidate: &str) -> Result<LinkRecord, Skip> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(Skip::Invalid);
        }

        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping invalid URL {:?}: {}", candidate, e);
                return Err(Skip::Invalid);
            }
        };

        let Some(host) = url.host_str().filter(|host| !host.is_empty()) else {
            tracing::debug!("Skipping URL without host: {}", candidate);
            return Err(Skip::Invalid);
        };

        let domain = registrable_domain(host);
        if domain != self.target_domain {
            return Err(Skip::OffDomain);
        }

        if !self.checker.is_allowed(robots_path(&url)) {
            tracing::debug!("Link {} is disallowed by robots.txt. Skipping", candidate);
            return Err(Skip::Disallowed);
        }

        let record = LinkRecord {
            url: candidate.to_string(),
            domain,
        };
        tracing::trace!("Keeping {} (domain {})", record.url, record.domain);
        Ok(record)
    }
}

enum Skip {
    Invalid,
    OffDomain,
    Disallowed,
}

impl Skip {
    fn count(self, counts: &mut SkipCounts) {
        match self {
            Self::Invalid => counts.invalid += 1,
            Self::OffDomain => counts.off_domain += 1,
            Self::Disallowed => counts.disallowed += 1,
        }
    }
}
