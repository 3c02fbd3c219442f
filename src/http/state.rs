//! Application state for the HTTP server.

use crate::services::session::SessionManager;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session manager holding live searches
    pub manager: SessionManager,
}

impl AppState {
    /// Create a new application state with the given session manager.
    pub fn new(manager: SessionManager) -> Self {
        Self { manager }
    }
}
