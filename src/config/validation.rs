use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the visitation concurrency limit
pub const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
///
/// The root URL is optional here since it may still be supplied on the
/// command line; see [`require_root_url`].
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Returns the parsed root sitemap URL, failing if none was configured
pub fn require_root_url(config: &Config) -> Result<Url, ConfigError> {
    match &config.crawler.root_url {
        Some(root) => validate_root_url(root),
        None => Err(ConfigError::Validation(
            "no root sitemap URL given".to_string(),
        )),
    }
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root_url {
        validate_root_url(root)?;
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.sitemap_marker.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_root_url(root: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", root, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Root URL '{}' must use HTTP or HTTPS scheme",
            root
        )));
    }

    Ok(url)
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.agents.is_empty() {
        return Err(ConfigError::Validation(
            "at least one user agent is required".to_string(),
        ));
    }

    if config.agents.iter().any(|agent| agent.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user agents cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
