//! Bounded-concurrency page visitation
//!
//! Every frontier page becomes one unit of work. A unit holds a gate permit
//! for the duration of its fetch and extraction, then reports its record (or
//! its failure) to the coordinator, which owns the result set.

use crate::crawler::extractor::{RecordExtractor, SeoRecord};
use crate::crawler::fetcher::FetchContext;
use crate::crawler::gate::ConcurrencyGate;
use crate::crawler::work_counter::{drain, Completion};
use std::sync::Arc;

/// Records collected by one visitation phase
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// One record per successfully visited page, in completion order
    pub records: Vec<SeoRecord>,

    /// Pages attempted (empty entries excluded)
    pub visited: usize,

    /// Pages that failed to fetch or extract
    pub failures: usize,
}

/// Visits frontier pages with at most `gate.limit()` requests in flight
#[derive(Clone)]
pub struct BoundedVisitor {
    fetch: FetchContext,
    extractor: Arc<dyn RecordExtractor>,
}

impl BoundedVisitor {
    pub fn new(fetch: FetchContext, extractor: Arc<dyn RecordExtractor>) -> Self {
        Self { fetch, extractor }
    }

    /// Visits every non-empty URL in `frontier`
    ///
    /// Empty entries never become a task and never touch the gate.
    pub async fn visit<S: AsRef<str>>(&self, frontier: &[S], gate: &ConcurrencyGate) -> ResultSet {
        let initial: Vec<String> = frontier
            .iter()
            .map(AsRef::as_ref)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();

        tracing::info!(
            "Visiting {} pages with concurrency {}",
            initial.len(),
            gate.limit()
        );

        let drained = drain(initial, |page_url: String| {
            let visitor = self.clone();
            let gate = gate.clone();
            async move { visitor.visit_one(page_url, gate).await }
        })
        .await;

        let results = ResultSet {
            records: drained.results,
            visited: drained.processed,
            failures: drained.failed,
        };

        tracing::info!(
            "Visitation complete: {} records, {} failures",
            results.records.len(),
            results.failures
        );

        results
    }

    async fn visit_one(
        &self,
        page_url: String,
        gate: ConcurrencyGate,
    ) -> Completion<String, SeoRecord> {
        let _permit = match gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("Skipping page {}: {}", page_url, e);
                return Completion::failed();
            }
        };

        let record = self
            .fetch
            .fetch(&page_url)
            .await
            .and_then(|document| self.extractor.extract(&document));

        match record {
            Ok(record) => Completion::done().with_result(record),
            Err(e) => {
                tracing::warn!("Encountered error, URL: {}: {}", page_url, e);
                Completion::failed()
            }
        }
    }
}
