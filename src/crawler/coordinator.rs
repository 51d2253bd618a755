//! Crawler coordinator - the two-phase crawl
//!
//! This module ties the components together:
//! - Building the fetcher, identity pool, classifier and extractor from config
//! - Expanding the sitemap tree into a frontier
//! - Visiting the frontier under the concurrency gate
//! - Summarizing the run
//!
//! Expansion fully drains before visitation starts.

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::expander::FrontierExpander;
use crate::crawler::extractor::{HtmlRecordExtractor, RecordExtractor, SeoRecord};
use crate::crawler::fetcher::{FetchContext, Fetcher, HttpFetcher};
use crate::crawler::gate::ConcurrencyGate;
use crate::crawler::identity::UserAgentPool;
use crate::crawler::sitemap::{DocumentClassifier, SitemapClassifier};
use crate::crawler::visitor::BoundedVisitor;
use crate::{ConfigError, SeoError};
use chrono::{DateTime, Utc};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

/// Tunables of one crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlOptions {
    /// Maximum number of page fetches in flight
    pub concurrency: NonZeroUsize,

    /// Per-request timeout handed to the fetcher
    pub request_timeout: Duration,

    /// Whether sitemap expansion shares the visitation gate
    pub gate_expansion: bool,
}

impl CrawlOptions {
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        let concurrency = NonZeroUsize::new(config.concurrency).ok_or_else(|| {
            ConfigError::Validation("concurrency must be at least 1".to_string())
        })?;

        Ok(Self {
            concurrency,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            gate_expansion: config.gate_expansion,
        })
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        let config = CrawlerConfig::default();
        Self {
            concurrency: NonZeroUsize::new(config.concurrency).unwrap_or(NonZeroUsize::MIN),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            gate_expansion: config.gate_expansion,
        }
    }
}

/// Outcome of a full crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// One record per successfully visited page
    pub records: Vec<SeoRecord>,

    /// Number of page URLs discovered during expansion
    pub frontier_len: usize,

    /// Sitemap documents processed
    pub sitemaps_fetched: usize,

    /// Sitemap documents that failed
    pub sitemap_failures: usize,

    /// Pages attempted
    pub pages_visited: usize,

    /// Pages that produced no record
    pub page_failures: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Total failed units across both phases
    pub fn failures(&self) -> usize {
        self.sitemap_failures + self.page_failures
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main crawler structure
pub struct Crawler {
    expander: FrontierExpander,
    visitor: BoundedVisitor,
    gate: ConcurrencyGate,
}

impl Crawler {
    /// Creates a crawler issuing real HTTP requests
    pub fn new(config: &Config) -> Result<Self, SeoError> {
        Self::with_fetcher(config, Arc::new(HttpFetcher::new()?))
    }

    /// Creates a crawler from configuration using the given fetcher
    ///
    /// The configuration is validated first; an invalid one is rejected.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, SeoError> {
        validate(config)?;
        let options = CrawlOptions::from_config(&config.crawler)?;
        let agents = Arc::new(UserAgentPool::from_config(&config.user_agent)?);
        let fetch = FetchContext::new(fetcher, agents, options.request_timeout);
        let classifier = Arc::new(SitemapClassifier::new(
            config.crawler.sitemap_marker.clone(),
        ));

        Ok(Self::from_parts(
            fetch,
            classifier,
            Arc::new(HtmlRecordExtractor),
            options,
        ))
    }

    /// Assembles a crawler from its collaborators
    pub fn from_parts(
        fetch: FetchContext,
        classifier: Arc<dyn DocumentClassifier>,
        extractor: Arc<dyn RecordExtractor>,
        options: CrawlOptions,
    ) -> Self {
        let gate = ConcurrencyGate::new(options.concurrency);

        let mut expander = FrontierExpander::new(fetch.clone(), classifier);
        if options.gate_expansion {
            expander = expander.with_gate(gate.clone());
        }

        Self {
            expander,
            visitor: BoundedVisitor::new(fetch, extractor),
            gate,
        }
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Discovers every page under `root_url` and visits each of them
    pub async fn run(&self, root_url: &str) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {}", root_url);

        let frontier = self.expander.expand(root_url).await;
        let results = self.visitor.visit(&frontier.pages, &self.gate).await;

        let report = CrawlReport {
            records: results.records,
            frontier_len: frontier.pages.len(),
            sitemaps_fetched: frontier.sitemaps_fetched,
            sitemap_failures: frontier.sitemap_failures,
            pages_visited: results.visited,
            page_failures: results.failures,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} records, {} failures in {}ms",
            report.records.len(),
            report.failures(),
            report.duration().num_milliseconds()
        );

        report
    }
}

/// Runs a complete crawl of `root_url` with the given configuration
pub async fn run_crawl(config: &Config, root_url: &str) -> Result<CrawlReport, SeoError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run(root_url).await)
}
