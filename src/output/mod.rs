//! Output module for crawl results
//!
//! This module handles:
//! - Exporting SEO records as CSV
//! - Summarizing crawl statistics

mod csv_writer;
pub mod stats;

pub use csv_writer::{write_csv, write_records};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
