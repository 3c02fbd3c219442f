//! Offer storage and retrieval.
//!
//! This module owns the boundary to the external flight-data provider via the
//! [`OfferSource`] trait, the keyed batch cache with its at-most-one-fetch-per-key
//! policy, the hash-keyed derived-result cache, and the injected persisted-store
//! seam. Core pipeline logic never talks to a provider or to ambient storage
//! directly; it goes through these abstractions.

pub mod cache;
pub mod derived;
#[cfg(feature = "local-source")]
pub mod local;
pub mod persist;

pub use cache::OfferCache;
pub use derived::{input_digest, DerivedCache};
#[cfg(feature = "local-source")]
pub use local::LocalOfferSource;
pub use persist::{InMemorySessionStore, SessionStore};

use std::sync::Arc;

use crate::models::{OfferBatch, SearchParams};

/// Default bound on offers fetched per search when the caller sets none.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The provider fetch failed. `retryable` hints whether a later attempt
    /// may succeed (e.g. a transient transport failure).
    #[error("fetch failed: {message}")]
    Fetch { message: String, retryable: bool },

    /// Configuration or initialization error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn fetch_retryable(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { retryable: true, .. })
    }
}

/// External provider of raw flight offers.
///
/// Implementations must be idempotent per search key: fetching the same
/// parameters twice returns equivalent batches.
#[async_trait::async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetch one batch of up to `params.max_results` raw offers.
    async fn fetch_offers(&self, params: &SearchParams) -> StoreResult<OfferBatch>;
}

/// Fetch orchestrator: one batch per distinct search key.
///
/// Reads short-circuit to the cache; a miss acquires the fetch lock and
/// re-checks before issuing the provider call, so concurrent requests for the
/// same key collapse into a single fetch.
pub struct FlightSearchEngine {
    source: Arc<dyn OfferSource>,
    cache: OfferCache,
    fetch_lock: tokio::sync::Mutex<()>,
}

impl FlightSearchEngine {
    pub fn new(source: Arc<dyn OfferSource>, cache_ttl_secs: u64) -> Self {
        Self {
            source,
            cache: OfferCache::new(cache_ttl_secs),
            fetch_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load the batch for a search, fetching at most once per distinct key.
    pub async fn load(&self, params: &SearchParams) -> StoreResult<Arc<OfferBatch>> {
        let key = params.cache_key();
        if let Some(batch) = self.cache.lookup(&key) {
            log::debug!("cache hit for {}", key);
            return Ok(batch);
        }

        let _guard = self.fetch_lock.lock().await;
        // A concurrent caller may have fetched while we waited for the lock.
        if let Some(batch) = self.cache.lookup(&key) {
            return Ok(batch);
        }

        log::debug!("fetching offers for {}", key);
        let batch = Arc::new(self.source.fetch_offers(params).await?);
        self.cache.insert(key, Arc::clone(&batch));
        Ok(batch)
    }

    /// Advisory prefetch: warm the cache entry for a search.
    ///
    /// Failures are logged and swallowed; a missed prefetch must never block
    /// or fail the caller's current render.
    pub async fn warm(&self, params: &SearchParams) {
        if let Err(e) = self.load(params).await {
            log::warn!("prefetch for {} failed: {}", params.cache_key(), e);
        }
    }

    pub fn cache(&self) -> &OfferCache {
        &self.cache
    }
}
