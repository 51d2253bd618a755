//! Termination detection for a dynamically growing set of tasks
//!
//! A unit of work may discover further units while it runs, so the total
//! number of tasks is never known up front. [`drain`] keeps a single
//! `outstanding` counter owned by the coordinating future: every task runs on
//! its own tokio task and hands a [`Completion`] back through a [`JoinSet`].
//! Only the coordinator ever touches the counter or the aggregated results,
//! so the run is finished exactly when the counter returns to zero.

use std::future::Future;
use tokio::task::JoinSet;

/// Report handed back to the coordinator when one unit of work finishes
#[derive(Debug)]
pub struct Completion<T, R> {
    /// Newly discovered units of work to schedule
    pub spawned: Vec<T>,

    /// Output contributed by the finished unit
    pub results: Vec<R>,

    /// Whether the unit failed (it still counts as completed)
    pub failed: bool,
}

impl<T, R> Completion<T, R> {
    /// A successful completion contributing nothing yet
    pub fn done() -> Self {
        Self {
            spawned: Vec::new(),
            results: Vec::new(),
            failed: false,
        }
    }

    /// A failed completion: no new work and no output
    pub fn failed() -> Self {
        Self {
            failed: true,
            ..Self::done()
        }
    }

    pub fn with_spawned(mut self, tasks: Vec<T>) -> Self {
        self.spawned.extend(tasks);
        self
    }

    pub fn with_result(mut self, result: R) -> Self {
        self.results.push(result);
        self
    }

    pub fn with_results(mut self, results: Vec<R>) -> Self {
        self.results.extend(results);
        self
    }
}

impl<T, R> Default for Completion<T, R> {
    fn default() -> Self {
        Self::done()
    }
}

/// Everything collected once the counter reached zero
#[derive(Debug)]
pub struct Drained<R> {
    /// Output of every completed unit, in completion order
    pub results: Vec<R>,

    /// Number of units that ran to completion (initial and discovered)
    pub processed: usize,

    /// Number of completed units that reported a failure or panicked
    pub failed: usize,
}

/// Runs `initial` and everything it transitively spawns, returning when no
/// unit is left outstanding
///
/// `work` is invoked on the coordinator for each unit and must return the
/// future that performs it; that future is spawned onto the runtime. A unit
/// that panics is counted as failed and contributes nothing, so the loop
/// still converges.
///
/// # Example
///
/// ```
/// use sitemap_seo::crawler::{drain, Completion};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let drained = rt.block_on(drain(vec![3u32], |n| async move {
///     let children = if n > 0 { vec![n - 1] } else { vec![] };
///     Completion::done().with_spawned(children).with_result(n)
/// }));
/// assert_eq!(drained.processed, 4);
/// ```
pub async fn drain<T, R, F, Fut>(initial: Vec<T>, mut work: F) -> Drained<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Completion<T, R>> + Send + 'static,
{
    let mut in_flight = JoinSet::new();
    let mut outstanding = initial.len();
    let mut drained = Drained {
        results: Vec::new(),
        processed: 0,
        failed: 0,
    };

    for task in initial {
        in_flight.spawn(work(task));
    }

    while outstanding > 0 {
        let Some(joined) = in_flight.join_next().await else {
            // every outstanding unit lives in the join set
            break;
        };

        let completion = match joined {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!("Work unit aborted: {}", e);
                Completion::failed()
            }
        };

        let discovered = completion.spawned.len();
        outstanding = outstanding + discovered - 1;
        drained.processed += 1;
        if completion.failed {
            drained.failed += 1;
        }
        drained.results.extend(completion.results);

        tracing::trace!(
            "Unit completed: {} discovered, {} outstanding",
            discovered,
            outstanding
        );

        for task in completion.spawned {
            in_flight.spawn(work(task));
        }
    }

    drained
}
