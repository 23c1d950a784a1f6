use crate::{UrlError, UrlResult};
use ::url::Url;

/// Validates a user-supplied URL before any network call is made
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. Parse the URL; reject if malformed
/// 3. Require an `http` or `https` scheme
/// 4. Require a non-empty host
///
/// # Arguments
///
/// * `raw` - The URL string as typed by the user
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The reason the URL was rejected
///
/// # Examples
///
/// ```
/// use sitescope::url::validate_input_url;
///
/// assert!(validate_input_url("https://example.com").is_ok());
/// assert!(validate_input_url("example.com").is_err());
/// assert!(validate_input_url("ftp://example.com").is_err());
/// ```
pub fn validate_input_url(raw: &str) -> UrlResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_input_url("https://example.com").is_ok());
        assert!(validate_input_url("http://example.com/path?q=1").is_ok());
        assert!(validate_input_url("  https://example.com/  ").is_ok());
        assert!(validate_input_url("http://127.0.0.1:8080/").is_ok());
    }

    #[test]
    fn test_empty() {
        assert!(matches!(validate_input_url(""), Err(UrlError::Empty)));
        assert!(matches!(validate_input_url("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_missing_scheme() {
        assert!(matches!(
            validate_input_url("example.com"),
            Err(UrlError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_scheme() {
        assert!(matches!(
            validate_input_url("ftp://example.com"),
            Err(UrlError::InvalidScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            validate_input_url("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_missing_host() {
        // The url crate already refuses special schemes without a host
        assert!(validate_input_url("http://").is_err());
        assert!(validate_input_url("https://:443/").is_err());
    }
}
