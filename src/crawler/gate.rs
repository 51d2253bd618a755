//! Global admission control for in-flight requests
//!
//! A thin wrapper over a tokio [`Semaphore`]: waiting for a permit suspends
//! only the calling task, and a permit is returned when its guard drops, so
//! every exit path of the holder releases it.

use crate::SeoError;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of simultaneous permit holders at a fixed limit
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    limit: usize,
}

/// A held slot in a [`ConcurrencyGate`], released on drop
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    /// Returns the slot to the gate
    pub fn release(self) {}
}

impl ConcurrencyGate {
    /// Creates a gate admitting at most `limit` holders at once
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit.get())),
            limit: limit.get(),
        }
    }

    /// Waits until fewer than `limit` permits are held, then takes one
    ///
    /// No ordering is promised among waiters.
    pub async fn acquire(&self) -> Result<GatePermit, SeoError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SeoError::GateClosed)?;

        Ok(GatePermit { _permit: permit })
    }

    /// Configured maximum number of holders
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of permits currently held
    pub fn in_use(&self) -> usize {
        self.limit - self.permits.available_permits()
    }
}
