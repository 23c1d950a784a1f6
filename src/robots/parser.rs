//! Robots.txt parser implementation
//!
//! This module turns raw robots.txt text into a [`RobotsPolicy`]. Parsing never
//! fails: lines that cannot be understood are skipped.

use crate::robots::Pattern;
use std::collections::HashMap;
use std::time::Duration;

/// The wildcard user-agent group used as the fallback for every crawler
pub const WILDCARD_AGENT: &str = "*";

/// Rules that apply to one user-agent group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Disallow patterns in file order
    pub disallow: Vec<Pattern>,

    /// Allow patterns in file order
    pub allow: Vec<Pattern>,

    /// Minimum wait between requests, if the group declares one
    pub crawl_delay: Option<Duration>,
}

/// Parsed robots.txt data
///
/// Maps lowercase user-agent tokens to their rule sets and keeps every
/// `Sitemap:` URL in the order it appeared. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    groups: HashMap<String, RuleSet>,
    sitemaps: Vec<String>,
}

impl RobotsPolicy {
    /// Parses raw robots.txt content
    ///
    /// # Parsing Rules
    ///
    /// - Blank lines and lines starting with `#` are ignored
    /// - Each line is split on its first `:`; lines without one are ignored
    /// - Field names are case-insensitive
    /// - `User-agent` moves the group cursor (initially `*`) to the lowercased value
    /// - `Allow`/`Disallow` with a non-empty value add a pattern to the cursor's group
    /// - `Crawl-delay` is read as fractional seconds; unparsable or negative values are dropped
    /// - `Sitemap` values are collected globally, whatever the cursor
    ///
    /// A rule line belongs only to the most recent `User-agent` line. Two
    /// consecutive `User-agent` lines do not share the rules that follow.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// The parsed policy; empty or garbage input yields an allow-all policy
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescope::robots::RobotsPolicy;
    ///
    /// let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private/\nSitemap: https://example.com/sitemap.xml");
    /// assert_eq!(policy.sitemaps(), ["https://example.com/sitemap.xml"]);
    /// assert_eq!(policy.group("*").unwrap().disallow.len(), 1);
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut policy = Self::default();
        let mut current_agent = WILDCARD_AGENT.to_string();

        for line in content.lines() {
            let trimmed = line.trim();

            // Skip comments and empty lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((field, value)) = trimmed.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    current_agent = value.to_lowercase();
                }
                "disallow" => {
                    if !value.is_empty() {
                        policy
                            .group_mut(&current_agent)
                            .disallow
                            .push(Pattern::new(value));
                    }
                }
                "allow" => {
                    if !value.is_empty() {
                        policy
                            .group_mut(&current_agent)
                            .allow
                            .push(Pattern::new(value));
                    }
                }
                "crawl-delay" => match parse_crawl_delay(value) {
                    Some(delay) => policy.group_mut(&current_agent).crawl_delay = Some(delay),
                    None => tracing::debug!("Ignoring invalid Crawl-delay value: {:?}", value),
                },
                "sitemap" => {
                    if !value.is_empty() {
                        policy.sitemaps.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        policy
    }

    /// Creates a policy with no groups and no sitemaps, which allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the rule set for an exact, already-lowercased user-agent key
    pub fn group(&self, agent: &str) -> Option<&RuleSet> {
        self.groups.get(agent)
    }

    /// Returns the sitemap URLs declared in the file, in file order
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Returns the number of user-agent groups that carry at least one rule
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the policy has no rules at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group_mut(&mut self, agent: &str) -> &mut RuleSet {
        self.groups.entry(agent.to_string()).or_default()
    }
}

/// Parses a Crawl-delay value given in (possibly fractional) seconds
///
/// The delay is kept at millisecond resolution.
fn parse_crawl_delay(value: &str) -> Option<Duration> {
    let seconds: f64 = value.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let millis = seconds * 1000.0;
    if millis > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_millis(millis as u64))
}
