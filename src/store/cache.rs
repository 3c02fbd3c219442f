//! Keyed offer-batch cache with time-based expiry.
//!
//! One entry per distinct search key, holding the single batch fetched for that
//! key. Entries expire after a configurable TTL; expiry is lazy (checked on
//! lookup) with an explicit `purge_expired` sweep for housekeeping.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{OfferBatch, SearchKey};

#[derive(Debug, Clone)]
struct CacheEntry {
    batch: Arc<OfferBatch>,
    fetched_at: DateTime<Utc>,
}

/// In-memory batch cache, keyed and append-only per key.
pub struct OfferCache {
    entries: RwLock<HashMap<SearchKey, CacheEntry>>,
    ttl: Duration,
    /// Clock hook so tests can drive expiry without sleeping.
    now: fn() -> DateTime<Utc>,
}

impl OfferCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
            now: Utc::now,
        }
    }

    #[cfg(test)]
    fn with_clock(ttl_secs: u64, now: fn() -> DateTime<Utc>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
            now,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        (self.now)() - entry.fetched_at < self.ttl
    }

    /// Return the cached batch for a key, unless absent or expired.
    pub fn lookup(&self, key: &SearchKey) -> Option<Arc<OfferBatch>> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if self.is_fresh(entry) {
            Some(Arc::clone(&entry.batch))
        } else {
            None
        }
    }

    /// Store a batch under its key, stamping the fetch time.
    pub fn insert(&self, key: SearchKey, batch: Arc<OfferBatch>) {
        let entry = CacheEntry {
            batch,
            fetched_at: (self.now)(),
        };
        self.entries.write().insert(key, entry);
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.write();
        let now = (self.now)();
        entries.retain(|_, entry| now - entry.fetched_at < self.ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
