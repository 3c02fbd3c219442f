//! Hash-keyed cache for derived computations.
//!
//! Derived views are pure functions of their inputs, so they are cached under a
//! SHA-256 digest of the serialized input tuple. Invalidation is explicit: the
//! owner calls `clear` when any upstream input (batch, filters, sort) changes,
//! rather than relying on implicit dependency tracking.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Compute the cache key for a serializable input tuple.
pub fn input_digest<T: serde::Serialize>(inputs: &T) -> String {
    // Serialization of an in-memory input tuple cannot fail for our types;
    // fall back to an empty payload rather than panicking if it ever does.
    let payload = serde_json::to_vec(inputs).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    hex::encode(hasher.finalize())
}

/// Cache of derived values keyed by input digest.
#[derive(Debug, Default)]
pub struct DerivedCache<V> {
    entries: HashMap<String, V>,
}

impl<V: Clone> DerivedCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, digest: &str) -> Option<V> {
        self.entries.get(digest).cloned()
    }

    pub fn insert(&mut self, digest: String, value: V) {
        self.entries.insert(digest, value);
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.entries.contains_key(digest)
    }

    /// Explicit invalidation of every cached derivation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
