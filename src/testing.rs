//! Testing utilities including mock implementations.
//!
//! These let callers exercise the scrape pipeline without network access or
//! real waiting.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::crawler::{DelayOutcome, PageFetcher, Sleeper};
use crate::FetchError;

/// A mock page fetcher serving canned documents and anchor lists.
///
/// Unknown URLs fail with a 404 [`FetchError::Status`].
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Raw documents by URL
    documents: Arc<RwLock<HashMap<String, String>>>,

    /// Anchor lists by page URL
    anchors: Arc<RwLock<HashMap<String, Vec<String>>>>,

    /// Every URL requested, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` from `fetch` (builder pattern).
    pub fn with_document(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), body.into());
        self
    }

    /// Serve `anchors` for `url` from `fetch_anchors` (builder pattern).
    pub fn with_anchors<I, S>(self, url: impl Into<String>, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anchors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), anchors.into_iter().map(Into::into).collect());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of times `url` was requested.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).iter().filter(|c| *c == url).count()
    }

    fn record(&self, url: &str) {
        self.calls.write().unwrap_or_else(PoisonError::into_inner).push(url.to_string());
    }

    fn not_found(url: &str) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: 404,
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.record(url);
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_anchors(&self, url: &str) -> Result<Vec<String>, FetchError> {
        self.record(url);
        self.anchors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }
}

/// A sleeper that returns immediately and records requested delays.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<RwLock<Vec<Duration>>>,
    cancelled: bool,
}

impl RecordingSleeper {
    /// Create a sleeper whose waits always elapse.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sleeper whose waits are always cancelled.
    pub fn cancelled() -> Self {
        Self {
            cancelled: true,
            ..Self::default()
        }
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) -> DelayOutcome {
        self.delays.write().unwrap_or_else(PoisonError::into_inner).push(delay);
        if self.cancelled {
            DelayOutcome::Cancelled
        } else {
            DelayOutcome::Elapsed
        }
    }
}
