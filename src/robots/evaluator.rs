//! Allow/deny and crawl-delay decisions against a parsed robots policy

use crate::robots::parser::{RobotsPolicy, RuleSet, WILDCARD_AGENT};
use std::time::Duration;

/// Capability for answering "may this path be fetched?"
///
/// Link discovery depends on this trait rather than on a concrete policy so
/// that tests and alternative policy sources can be plugged in.
pub trait PolicyChecker {
    /// Returns true if the given request path may be fetched
    fn is_allowed(&self, path: &str) -> bool;
}

/// Answers queries against one immutable [`RobotsPolicy`]
///
/// Evaluation is pure: the same query against the same evaluator always
/// returns the same answer.
#[derive(Debug, Clone, Default)]
pub struct PolicyEvaluator {
    policy: RobotsPolicy,
}

impl PolicyEvaluator {
    /// Wraps a parsed policy
    pub fn new(policy: RobotsPolicy) -> Self {
        Self { policy }
    }

    /// Creates an evaluator that allows every path and declares no delay
    pub fn allow_all() -> Self {
        Self::new(RobotsPolicy::allow_all())
    }

    /// Returns the wrapped policy
    pub fn policy(&self) -> &RobotsPolicy {
        &self.policy
    }

    /// Checks if a path is allowed for the given user agent
    ///
    /// # Precedence
    ///
    /// The group is resolved by exact (lowercased) user-agent match, falling
    /// back to the `*` group; with neither present everything is allowed.
    /// Inside the group, any matching Allow pattern wins over any matching
    /// Disallow pattern regardless of pattern length.
    ///
    /// # Arguments
    ///
    /// * `path` - The request path to check (e.g., "/page.html")
    /// * `user_agent` - The robots user-agent token
    ///
    /// # Returns
    ///
    /// * `true` - If the path is allowed
    /// * `false` - If the path is disallowed
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescope::robots::{PolicyEvaluator, RobotsPolicy};
    ///
    /// let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private/\nAllow: /private/public/");
    /// let evaluator = PolicyEvaluator::new(policy);
    /// assert!(!evaluator.is_allowed("/private/", "Mozilla"));
    /// assert!(evaluator.is_allowed("/private/public/", "Mozilla"));
    /// ```
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let Some(group) = self.resolve_group(user_agent) else {
            return true;
        };

        if group.allow.iter().any(|pattern| pattern.matches(path)) {
            return true;
        }

        !group.disallow.iter().any(|pattern| pattern.matches(path))
    }

    /// Gets the crawl delay for a user agent
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The robots user-agent token
    /// * `default_delay` - Returned when the resolved group declares no delay
    pub fn crawl_delay(&self, user_agent: &str, default_delay: Duration) -> Duration {
        self.resolve_group(user_agent)
            .and_then(|group| group.crawl_delay)
            .unwrap_or(default_delay)
    }

    /// Binds this evaluator to one user agent, producing a [`PolicyChecker`]
    pub fn for_agent<'a>(&'a self, user_agent: &'a str) -> AgentPolicy<'a> {
        AgentPolicy {
            evaluator: self,
            user_agent,
        }
    }

    fn resolve_group(&self, user_agent: &str) -> Option<&RuleSet> {
        self.policy
            .group(&user_agent.to_lowercase())
            .or_else(|| self.policy.group(WILDCARD_AGENT))
    }
}

/// A [`PolicyEvaluator`] bound to a single user agent
#[derive(Debug, Clone, Copy)]
pub struct AgentPolicy<'a> {
    evaluator: &'a PolicyEvaluator,
    user_agent: &'a str,
}

impl PolicyChecker for AgentPolicy<'_> {
    fn is_allowed(&self, path: &str) -> bool {
        self.evaluator.is_allowed(path, self.user_agent)
    }
}
