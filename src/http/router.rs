//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Search session lifecycle
        .route("/searches", post(handlers::create_search))
        .route("/searches/last", get(handlers::last_search))
        .route("/searches/{search_id}", delete(handlers::delete_search))
        // Derived view + interactive state
        .route("/searches/{search_id}/results", get(handlers::get_results))
        .route("/searches/{search_id}/filters", put(handlers::update_filters))
        .route("/searches/{search_id}/sort", put(handlers::update_sort))
        .route("/searches/{search_id}/page", put(handlers::update_page))
        .route("/searches/{search_id}/share", get(handlers::share_link));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
