//! Robots.txt path pattern matching
//!
//! Patterns are matched literally except for `*`, which matches any sequence
//! of characters. A match is always anchored at the start of the path, and
//! anchored at the end unless the pattern itself ends with `*`.

use regex::Regex;

/// A compiled Allow/Disallow pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    /// `None` only when the regex exceeded the compiled size limit
    regex: Option<Regex>,
}

impl Pattern {
    /// Compiles a raw pattern string taken from a robots.txt directive
    ///
    /// # Arguments
    ///
    /// * `raw` - The pattern as written after `Allow:` or `Disallow:`
    ///
    /// # Returns
    ///
    /// A Pattern ready to be matched against request paths
    pub fn new(raw: &str) -> Self {
        let regex = match Regex::new(&to_regex(raw)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::debug!("Pattern '{}' failed to compile, using literal match: {}", raw, e);
                None
            }
        };

        Self {
            raw: raw.to_string(),
            regex,
        }
    }

    /// Returns the pattern as it appeared in the robots.txt file
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Checks whether the given path matches this pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescope::robots::Pattern;
    ///
    /// assert!(Pattern::new("/private/").matches("/private/"));
    /// assert!(!Pattern::new("/private/").matches("/private/page"));
    /// assert!(Pattern::new("/private/*").matches("/private/page"));
    /// assert!(Pattern::new("/*.pdf").matches("/docs/report.pdf"));
    /// ```
    pub fn matches(&self, path: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(path),
            None => self.raw == path,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Pattern {}

/// Translates a robots.txt pattern into an anchored regular expression
fn to_regex(raw: &str) -> String {
    let body = raw
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    if raw.ends_with('*') {
        format!("^{}", body)
    } else {
        format!("^{}$", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_is_exact() {
        let pattern = Pattern::new("/admin");
        assert!(pattern.matches("/admin"));
        assert!(!pattern.matches("/admin/users"));
        assert!(!pattern.matches("/administrator"));
        assert!(!pattern.matches("/public/admin"));
    }

    #[test]
    fn test_trailing_wildcard_is_prefix() {
        let pattern = Pattern::new("/admin*");
        assert!(pattern.matches("/admin"));
        assert!(pattern.matches("/admin/users"));
        assert!(pattern.matches("/administrator"));
        assert!(!pattern.matches("/public/admin"));
    }

    #[test]
    fn test_inner_wildcard() {
        let pattern = Pattern::new("/*/edit");
        assert!(pattern.matches("/posts/edit"));
        assert!(pattern.matches("/posts/42/edit"));
        assert!(!pattern.matches("/posts/edit/history"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = Pattern::new("/search?q=(a+b)");
        assert!(pattern.matches("/search?q=(a+b)"));
        assert!(!pattern.matches("/searchq=aab"));

        let dollar = Pattern::new("/*.php$");
        assert!(dollar.matches("/index.php$"));
        assert!(!dollar.matches("/index.php"));

        let dot = Pattern::new("/file.txt");
        assert!(!dot.matches("/fileatxt"));
    }

    #[test]
    fn test_lone_wildcard_matches_everything() {
        let pattern = Pattern::new("*");
        assert!(pattern.matches(""));
        assert!(pattern.matches("/"));
        assert!(pattern.matches("/anything/at/all"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = Pattern::new("/");
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/page"));
    }

    #[test]
    fn test_as_str_keeps_raw_text() {
        assert_eq!(Pattern::new("/a*b").as_str(), "/a*b");
    }

    #[test]
    fn test_to_regex() {
        assert_eq!(to_regex("/a"), "^/a$");
        assert_eq!(to_regex("/a*"), "^/a.*");
        assert_eq!(to_regex("/a.b*c"), "^/a\\.b.*c$");
    }
}
