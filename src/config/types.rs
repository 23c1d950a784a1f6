use serde::Deserialize;

/// Default HTTP User-Agent header
pub const DEFAULT_USER_AGENT: &str = "BlackWidow/1.0";

const WILDCARD_TOKEN: &str = "*";

/// Main configuration structure for Sitescope
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Value of the User-Agent header sent with every request
    pub user_agent: String,

    /// Group name looked up in robots.txt; derived from `user_agent` when unset
    pub robots_token: Option<String>,

    /// Request timeout (milliseconds)
    pub timeout_ms: u64,

    /// Whether HTTP redirects are followed
    pub follow_redirects: bool,

    /// Maximum redirects followed per request
    pub max_redirects: usize,

    /// Crawl delay used when robots.txt declares none (milliseconds)
    pub default_crawl_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            robots_token: None,
            timeout_ms: 10_000,
            follow_redirects: true,
            max_redirects: 10,
            default_crawl_delay_ms: 1_000,
        }
    }
}

impl ScraperConfig {
    /// The robots.txt group name for this scraper
    ///
    /// Falls back to the product token of the user agent, lowercased:
    /// `BlackWidow/1.0 (+https://example.com)` yields `blackwidow`.
    pub fn robots_token(&self) -> String {
        if let Some(token) = &self.robots_token {
            return token.trim().to_lowercase();
        }

        self.user_agent
            .split(|c: char| c == '/' || c.is_whitespace())
            .find(|part| !part.is_empty())
            .unwrap_or(WILDCARD_TOKEN)
            .to_lowercase()
    }
}
