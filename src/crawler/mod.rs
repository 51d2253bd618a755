//! Crawler module for sitemap expansion and page visitation
//!
//! This module contains the core crawling logic, including:
//! - Termination detection for dynamically growing work
//! - The global concurrency gate
//! - Recursive sitemap expansion into a frontier
//! - Bounded visitation of the frontier into SEO records
//! - HTTP fetching, sitemap classification and record extraction

mod coordinator;
mod expander;
mod extractor;
mod fetcher;
mod gate;
mod identity;
mod sitemap;
mod visitor;
mod work_counter;

pub use coordinator::{run_crawl, CrawlOptions, CrawlReport, Crawler};
pub use expander::{Frontier, FrontierExpander};
pub use extractor::{HtmlRecordExtractor, RecordExtractor, SeoRecord};
pub use fetcher::{build_http_client, decode_body, Document, FetchContext, Fetcher, HttpFetcher};
pub use gate::{ConcurrencyGate, GatePermit};
pub use identity::UserAgentPool;
pub use sitemap::{
    extract_locations, split_by_marker, Classified, DocumentClassifier, SitemapClassifier,
    DEFAULT_SITEMAP_MARKER,
};
pub use visitor::{BoundedVisitor, ResultSet};
pub use work_counter::{drain, Completion, Drained};

use crate::config::Config;
use crate::SeoError;

/// Crawls the sitemap tree under `root_url` and visits every page found
///
/// At most `concurrency_limit` page requests are in flight at any time.
/// Everything else uses the default configuration.
///
/// # Arguments
///
/// * `root_url` - URL of the root sitemap
/// * `concurrency_limit` - Maximum simultaneous page fetches (at least 1)
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Records of every page visited successfully
/// * `Err(SeoError)` - The crawler could not be set up
pub async fn crawl(root_url: &str, concurrency_limit: usize) -> Result<CrawlReport, SeoError> {
    let mut config = Config::default();
    config.crawler.concurrency = concurrency_limit;
    run_crawl(&config, root_url).await
}
