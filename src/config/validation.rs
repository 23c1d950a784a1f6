use crate::config::types::{Config, ScraperConfig};
use crate::ConfigError;

const MAX_TIMEOUT_MS: u64 = 300_000;
const MAX_REDIRECTS: usize = 50;
const MAX_DEFAULT_CRAWL_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_user_agent(&config.user_agent)?;

    if let Some(token) = &config.robots_token {
        validate_robots_token(token)?;
    }

    if config.timeout_ms < 1 || config.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be between 1 and {}, got {}",
            MAX_TIMEOUT_MS, config.timeout_ms
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.default_crawl_delay_ms > MAX_DEFAULT_CRAWL_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "default-crawl-delay-ms must be <= {}ms, got {}ms",
            MAX_DEFAULT_CRAWL_DELAY_MS, config.default_crawl_delay_ms
        )));
    }

    Ok(())
}

/// Validates the User-Agent header value
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // Control characters are rejected by the HTTP client at request time
    if user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user-agent must not contain control characters, got {:?}",
            user_agent
        )));
    }

    Ok(())
}

/// Validates the robots.txt group name
fn validate_robots_token(token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::Validation(
            "robots-token cannot be empty".to_string(),
        ));
    }

    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "robots-token must be a single token without whitespace, got '{}'",
            token
        )));
    }

    Ok(())
}
