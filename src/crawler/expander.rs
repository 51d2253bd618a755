//! Recursive sitemap-tree expansion
//!
//! Starting from the root sitemap, every sitemap document is fetched and
//! classified on its own task. Child sitemaps become new units of work for
//! the [`drain`] loop while page URLs are handed back to the coordinator,
//! which alone appends them to the frontier.

use crate::crawler::fetcher::FetchContext;
use crate::crawler::gate::ConcurrencyGate;
use crate::crawler::sitemap::{Classified, DocumentClassifier};
use crate::crawler::work_counter::{drain, Completion};
use std::sync::Arc;

/// Page URLs discovered under a root sitemap
///
/// Order is unspecified and the same page linked from several sitemaps
/// appears once per link.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// Discovered page URLs
    pub pages: Vec<String>,

    /// Sitemap documents processed, including failed ones
    pub sitemaps_fetched: usize,

    /// Sitemap documents that failed to fetch or classify
    pub sitemap_failures: usize,
}

impl Frontier {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }
}

/// Discovers the frontier of a sitemap tree
#[derive(Clone)]
pub struct FrontierExpander {
    fetch: FetchContext,
    classifier: Arc<dyn DocumentClassifier>,
    gate: Option<ConcurrencyGate>,
}

impl FrontierExpander {
    /// Creates an expander with unbounded fan-out
    pub fn new(fetch: FetchContext, classifier: Arc<dyn DocumentClassifier>) -> Self {
        Self {
            fetch,
            classifier,
            gate: None,
        }
    }

    /// Bounds expansion fetches by `gate` as well
    pub fn with_gate(mut self, gate: ConcurrencyGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Expands `root_url` until no sitemap is left outstanding
    ///
    /// Failures are logged and skipped; an empty root yields an empty frontier.
    pub async fn expand(&self, root_url: &str) -> Frontier {
        let initial = if root_url.is_empty() {
            Vec::new()
        } else {
            vec![root_url.to_string()]
        };

        tracing::info!("Expanding sitemap tree from {}", root_url);

        let drained = drain(initial, |sitemap_url: String| {
            let expander = self.clone();
            async move { expander.expand_one(sitemap_url).await }
        })
        .await;

        let frontier = Frontier {
            pages: drained.results,
            sitemaps_fetched: drained.processed,
            sitemap_failures: drained.failed,
        };

        tracing::info!(
            "Expansion complete: {} pages from {} sitemaps ({} failed)",
            frontier.len(),
            frontier.sitemaps_fetched,
            frontier.sitemap_failures
        );

        frontier
    }

    async fn expand_one(&self, sitemap_url: String) -> Completion<String, String> {
        let fetched = {
            let _permit = match &self.gate {
                Some(gate) => match gate.acquire().await {
                    Ok(permit) => Some(permit),
                    Err(e) => {
                        tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
                        return Completion::failed();
                    }
                },
                None => None,
            };
            self.fetch.fetch(&sitemap_url).await
        };

        let document = match fetched {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Error retrieving sitemap {}: {}", sitemap_url, e);
                return Completion::failed();
            }
        };

        match self.classifier.classify(&document) {
            Ok(Classified { sitemaps, pages }) => {
                tracing::debug!(
                    "Sitemap {}: {} child sitemaps, {} pages",
                    sitemap_url,
                    sitemaps.len(),
                    pages.len()
                );
                Completion::done().with_spawned(sitemaps).with_results(pages)
            }
            Err(e) => {
                tracing::warn!("Error extracting URLs from sitemap {}: {}", sitemap_url, e);
                Completion::failed()
            }
        }
    }
}
