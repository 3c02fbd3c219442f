//! Service layer: the flight-offer data pipeline.
//!
//! Pure derivation stages (normalize, filter, sort, aggregate) plus the
//! session controller that owns the interactive state and recomputes the
//! display view when it changes.

pub mod filter;
pub mod normalizer;
pub mod price_trend;
pub mod session;
pub mod sort;

#[cfg(test)]
mod session_tests;

pub use filter::{apply_filters, filter_options, FilterDefaults, FilterOptions, FilterState};
pub use normalizer::{normalize, normalize_batch, ProcessedFlight};
pub use price_trend::{aggregate_price_trend, PriceTrend};
pub use session::{SearchResultsView, SearchSession, SessionManager};
pub use sort::{sort_flights, SortDirection, SortField};
