//! Farescope HTTP Server Binary
//!
//! This is the main entry point for the flight search REST API server.
//! It loads configuration, wires the offer source into the search engine,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the canned local offer source (default)
//! cargo run --bin farescope-server --features "local-source,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use farescope::config::EngineConfig;
use farescope::http::{create_router, AppState};
use farescope::services::session::SessionManager;
use farescope::store::{FlightSearchEngine, InMemorySessionStore, LocalOfferSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Farescope HTTP Server");

    // Load configuration (built-in defaults when no farescope.toml exists)
    let config = EngineConfig::from_default_location().map_err(|e| anyhow::anyhow!(e))?;
    info!(
        "Engine configured: page_size={}, max_results={}, cache_ttl={}s",
        config.engine.page_size, config.engine.max_results, config.engine.cache_ttl_secs
    );

    // Wire the offer source into the engine and session manager
    let source = Arc::new(LocalOfferSource::seeded());
    let engine = Arc::new(FlightSearchEngine::new(source, config.engine.cache_ttl_secs));
    let store = Arc::new(InMemorySessionStore::new());
    let manager = SessionManager::new(engine, store, config.engine.page_size);

    // Create application state and router
    let state = AppState::new(manager);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
