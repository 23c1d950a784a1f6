//! Sitemap handling module
//!
//! This module fetches the sitemaps a robots.txt declares and merges every
//! page URL they list, following sitemap indexes, into one [`SitemapIndex`].
//! URL identity is the exact string: `/a` and `/a/` are different entries.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::crawler::PageFetcher;
use crate::FetchError;
use std::collections::{BTreeSet, HashSet, VecDeque};
use thiserror::Error;

/// Errors for a single sitemap document
///
/// These never escape aggregation; a failing sitemap is logged and skipped.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),

    #[error("Malformed sitemap XML: {0}")]
    Xml(String),

    #[error("Unrecognized sitemap root element: <{0}>")]
    UnknownRoot(String),

    #[error("Sitemap document has no root element")]
    NoRoot,
}

/// The set of page URLs declared by a domain's sitemaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapIndex {
    urls: BTreeSet<String>,
}

impl SitemapIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the exact URL string is in the index
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Iterates over the URLs in the index
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.urls.iter()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl FromIterator<String> for SitemapIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SitemapIndex {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Fetches and merges the page URLs from a list of sitemaps
///
/// Sitemaps are fetched one at a time. Sitemap indexes queue their children,
/// which are merged the same way. Each sitemap URL is fetched at most once,
/// so an index that lists itself or an ancestor does not loop. A sitemap
/// that fails to fetch or parse is skipped.
///
/// # Arguments
///
/// * `sitemap_urls` - The sitemap URLs, typically from robots.txt
/// * `fetcher` - The page fetcher to use
///
/// # Returns
///
/// The union of every page URL that could be read
pub async fn aggregate(sitemap_urls: &[String], fetcher: &dyn PageFetcher) -> SitemapIndex {
    let mut urls = BTreeSet::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut pending: VecDeque<String> = sitemap_urls.iter().cloned().collect();

    while let Some(sitemap_url) = pending.pop_front() {
        if !visited.insert(sitemap_url.clone()) {
            tracing::debug!("Sitemap {} already processed, skipping", sitemap_url);
            continue;
        }

        tracing::info!("Fetching sitemap from {}", sitemap_url);
        match fetch_sitemap(fetcher, &sitemap_url).await {
            Ok(SitemapDocument::UrlSet(locs)) => {
                tracing::info!("Found {} URLs in sitemap {}", locs.len(), sitemap_url);
                urls.extend(locs);
            }
            Ok(SitemapDocument::Index(children)) => {
                tracing::info!(
                    "Sitemap index {} lists {} sitemaps",
                    sitemap_url,
                    children.len()
                );
                pending.extend(children);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch/parse sitemap from {}: {}", sitemap_url, e);
            }
        }
    }

    SitemapIndex { urls }
}

async fn fetch_sitemap(
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<SitemapDocument, SitemapError> {
    let content = fetcher.fetch(url).await?;
    parse_sitemap(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    fn urlset(urls: &[&str]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(
            r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    fn index(children: &[&str]) -> String {
        let entries: String = children
            .iter()
            .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
            .collect();
        format!("<sitemapindex>{}</sitemapindex>", entries)
    }

    #[tokio::test]
    async fn test_single_urlset() {
        let fetcher = MockFetcher::new().with_document(
            "https://example.com/sitemap.xml",
            urlset(&["https://example.com/a", "https://example.com/b"]),
        );

        let result = aggregate(&["https://example.com/sitemap.xml".to_string()], &fetcher).await;

        assert_eq!(result.len(), 2);
        assert!(result.contains("https://example.com/a"));
        assert!(result.contains("https://example.com/b"));
    }

    #[tokio::test]
    async fn test_index_merges_children() {
        let fetcher = MockFetcher::new()
            .with_document(
                "https://example.com/sitemap_index.xml",
                index(&[
                    "https://example.com/posts.xml",
                    "https://example.com/pages.xml",
                ]),
            )
            .with_document(
                "https://example.com/posts.xml",
                urlset(&["https://example.com/p1", "https://example.com/shared"]),
            )
            .with_document(
                "https://example.com/pages.xml",
                urlset(&["https://example.com/about", "https://example.com/shared"]),
            );

        let result = aggregate(
            &["https://example.com/sitemap_index.xml".to_string()],
            &fetcher,
        )
        .await;

        let expected: SitemapIndex = [
            "https://example.com/p1",
            "https://example.com/shared",
            "https://example.com/about",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_nested_indexes() {
        let fetcher = MockFetcher::new()
            .with_document("https://example.com/root.xml", index(&["https://example.com/mid.xml"]))
            .with_document("https://example.com/mid.xml", index(&["https://example.com/leaf.xml"]))
            .with_document("https://example.com/leaf.xml", urlset(&["https://example.com/deep"]));

        let result = aggregate(&["https://example.com/root.xml".to_string()], &fetcher).await;

        assert_eq!(result.iter().collect::<Vec<_>>(), vec!["https://example.com/deep"]);
    }

    #[tokio::test]
    async fn test_index_cycle_terminates() {
        let fetcher = MockFetcher::new()
            .with_document(
                "https://example.com/a.xml",
                index(&["https://example.com/b.xml"]),
            )
            .with_document(
                "https://example.com/b.xml",
                index(&["https://example.com/a.xml", "https://example.com/c.xml"]),
            )
            .with_document("https://example.com/c.xml", urlset(&["https://example.com/page"]));

        let result = aggregate(&["https://example.com/a.xml".to_string()], &fetcher).await;

        assert_eq!(result.len(), 1);
        assert_eq!(fetcher.call_count("https://example.com/a.xml"), 1);
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let fetcher = MockFetcher::new()
            .with_document("https://example.com/broken.xml", "<urlset><url><loc>x</url>")
            .with_document("https://example.com/html.xml", "<html><body>404</body></html>")
            .with_document("https://example.com/good.txt", "https://example.com/ok\n");

        let sitemaps = vec![
            "https://example.com/missing.xml".to_string(),
            "https://example.com/broken.xml".to_string(),
            "https://example.com/html.xml".to_string(),
            "https://example.com/good.txt".to_string(),
        ];
        let result = aggregate(&sitemaps, &fetcher).await;

        assert_eq!(result.iter().collect::<Vec<_>>(), vec!["https://example.com/ok"]);
        assert_eq!(fetcher.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_exact_string_identity() {
        let fetcher = MockFetcher::new().with_document(
            "https://example.com/sitemap.txt",
            "https://example.com/a\nhttps://example.com/a/\nhttps://EXAMPLE.com/a\nhttps://example.com/a\n",
        );

        let result = aggregate(&["https://example.com/sitemap.txt".to_string()], &fetcher).await;

        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_no_sitemaps() {
        let fetcher = MockFetcher::new();
        let result = aggregate(&[], &fetcher).await;
        assert!(result.is_empty());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_declarations_fetched_once() {
        let fetcher = MockFetcher::new().with_document(
            "https://example.com/sitemap.xml",
            urlset(&["https://example.com/a"]),
        );
        let sitemaps = vec![
            "https://example.com/sitemap.xml".to_string(),
            "https://example.com/sitemap.xml".to_string(),
        ];

        let result = aggregate(&sitemaps, &fetcher).await;

        assert_eq!(result.len(), 1);
        assert_eq!(fetcher.call_count("https://example.com/sitemap.xml"), 1);
    }
}
