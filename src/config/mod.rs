//! Configuration module for Sitemap-SEO
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_seo::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap-seo.toml")).unwrap();
//! println!("Visiting with concurrency: {}", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{require_root_url, validate, MAX_CONCURRENCY};
