//! Cached robots.txt entry for one domain
//!
//! Entries record when they were fetched and whether the fetch failed, so a
//! long-lived store can expire them and callers can tell degraded mode apart.

use crate::robots::PolicyEvaluator;
use chrono::{DateTime, Duration, Utc};

/// Cached robots.txt data for a domain
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The evaluator over the parsed robots.txt content
    pub evaluator: PolicyEvaluator,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,

    /// True when robots.txt could not be retrieved and allow-all is in effect
    pub degraded: bool,
}

impl CachedRobots {
    /// Creates a cache entry from a successfully fetched policy
    pub fn new(evaluator: PolicyEvaluator) -> Self {
        Self {
            evaluator,
            fetched_at: Utc::now(),
            degraded: false,
        }
    }

    /// Creates the allow-all entry used when robots.txt could not be fetched
    pub fn degraded() -> Self {
        Self {
            evaluator: PolicyEvaluator::allow_all(),
            fetched_at: Utc::now(),
            degraded: true,
        }
    }

    /// Checks if the cached robots.txt is stale (older than 24 hours)
    ///
    /// # Returns
    ///
    /// * `true` - If the cache is older than 24 hours
    /// * `false` - If the cache is still fresh
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns how long ago the robots.txt was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}
