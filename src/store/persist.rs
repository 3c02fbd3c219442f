//! Persisted-store seam.
//!
//! The session controller persists small bits of state (the last search, for
//! link restoration) through this interface instead of any ambient storage, so
//! the core stays host-agnostic. Hosts supply their own implementation; the
//! in-memory one backs tests and the dev server.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Minimal key-value persistence interface.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Option<serde_json::Value>;
    fn save(&self, key: &str, value: serde_json::Value);
}

/// In-memory implementation for tests and local development.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().get(key).cloned()
    }

    fn save(&self, key: &str, value: serde_json::Value) {
        self.entries.write().insert(key.to_string(), value);
    }
}
