//! Crawl-delay waiting
//!
//! The delay blocks the scrape for the resolved duration before the page is
//! fetched. A cancelled wait is reported as [`DelayOutcome::Cancelled`], never
//! as an error.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a delay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    /// The full duration elapsed
    Elapsed,
    /// The wait was interrupted before the duration elapsed
    Cancelled,
}

/// Blocking delay primitive honoring cancellation
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `delay`, returning early if cancelled
    async fn sleep(&self, delay: Duration) -> DelayOutcome;
}

/// [`Sleeper`] built on the tokio timer
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper {
    cancel: CancellationToken,
}

impl TokioSleeper {
    /// Creates a sleeper that is cancelled through the given token
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Returns the token that interrupts this sleeper's waits
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) -> DelayOutcome {
        if self.cancel.is_cancelled() {
            return DelayOutcome::Cancelled;
        }
        if delay.is_zero() {
            return DelayOutcome::Elapsed;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => DelayOutcome::Elapsed,
            _ = self.cancel.cancelled() => DelayOutcome::Cancelled,
        }
    }
}
