//! # Farescope
//!
//! In-memory flight-offer search results engine.
//!
//! This crate normalizes raw flight offers from a data provider into a derived
//! model, applies a multi-dimensional filter predicate in real time, sorts,
//! paginates with a prefetch-ahead cache, and aggregates prices into histogram
//! buckets for visualization. The optional HTTP surface exposes the derived
//! view over a REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Consolidated public types for hosts
//! - [`models`]: Provider wire model and search parameters
//! - [`services`]: The derivation pipeline (normalize, filter, sort,
//!   aggregate) and the session controller
//! - [`store`]: Offer source abstraction, keyed batch cache, derived-result
//!   cache, and the persisted-store seam
//! - [`config`]: TOML engine configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Data flow
//!
//! ```text
//! raw offers ──▶ normalizer ──▶ filter ──▶ sort ──▶ page slice
//!                    │                       │
//!                    │                       └──▶ price aggregation
//!                    └──▶ filter options
//! ```
//!
//! Filtering, sorting, and aggregation are synchronous pure computations; the
//! only asynchronous operations are the provider fetch and the advisory
//! prefetch, both keyed and idempotent.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;
