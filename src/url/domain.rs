use ::url::Url;
use std::net::IpAddr;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescope::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Maps a host name to its registrable domain
///
/// The registrable domain is the longest recognized public suffix of the host
/// plus the one label in front of it, so `www.example.co.uk` becomes
/// `example.co.uk`. Hosts without a recognized public suffix (IP literals,
/// private or unknown TLDs, single-label names) only lose a leading `www.`.
///
/// # Arguments
///
/// * `host` - The host name, in any case
///
/// # Returns
///
/// The lowercase registrable domain. Never fails.
///
/// # Examples
///
/// ```
/// use sitescope::url::registrable_domain;
///
/// assert_eq!(registrable_domain("www.example.co.uk"), "example.co.uk");
/// assert_eq!(registrable_domain("sub.example.com"), "example.com");
/// assert_eq!(registrable_domain("203.0.113.5"), "203.0.113.5");
/// assert_eq!(registrable_domain("www.intranet"), "intranet");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();

    if is_ip_literal(&host) {
        return host;
    }

    if let Some(domain) = psl::domain(host.as_bytes()) {
        if domain.suffix().is_known() {
            if let Ok(domain) = std::str::from_utf8(domain.as_bytes()) {
                return domain.to_string();
            }
        }
    }

    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host,
    }
}

/// Checks if a host belongs to the given registrable domain
///
/// # Examples
///
/// ```
/// use sitescope::url::same_domain;
///
/// assert!(same_domain("blog.Example.com", "example.COM"));
/// assert!(!same_domain("example.org", "example.com"));
/// ```
pub fn same_domain(host: &str, reference_domain: &str) -> bool {
    registrable_domain(host).eq_ignore_ascii_case(reference_domain.trim())
}

fn is_ip_literal(host: &str) -> bool {
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    unbracketed.parse::<IpAddr>().is_ok()
}
