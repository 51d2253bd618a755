//! Sitemap-SEO: a bounded-concurrency sitemap auditor
//!
//! This crate discovers every page reachable from a root sitemap, visits each
//! page under a global concurrency cap, and collects a small SEO record
//! (title, first heading, meta description, status code) per page.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Sitemap-SEO operations
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to decode body of {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Malformed sitemap at {url}: {message}")]
    Classify { url: String, message: String },

    #[error("Failed to extract SEO record from {url}: {message}")]
    Extract { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Concurrency gate closed")]
    GateClosed,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeoError {
    /// Builds the right variant for a failed request, separating timeouts
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            SeoError::Timeout {
                url: url.to_string(),
            }
        } else {
            SeoError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sitemap-SEO operations
pub type Result<T> = std::result::Result<T, SeoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, SeoRecord};
