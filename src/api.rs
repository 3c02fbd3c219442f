//! Public API surface for the flight search core.
//!
//! This file consolidates the types a host (display layer, HTTP surface,
//! tests) needs to drive the pipeline. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::models::offer::{
    Itinerary, OfferBatch, OfferPrice, RawOffer, Segment, SegmentEndpoint,
};
pub use crate::models::search::{SearchKey, SearchParams, TravelClass};

pub use crate::services::filter::{
    apply_filters, filter_options, FilterDefaults, FilterError, FilterOptions, FilterState,
    HourRange, RangeFilter, StopCategory, FALLBACK_DURATION_RANGE, FALLBACK_PRICE_RANGE,
};
pub use crate::services::normalizer::{
    normalize, normalize_batch, NormalizeError, ProcessedFlight,
};
pub use crate::services::price_trend::{
    aggregate_price_trend, PricePoint, PriceTrend, PRICE_BUCKET_WIDTH,
};
pub use crate::services::session::{
    SearchResultsView, SearchSession, SessionManager, DEFAULT_PAGE_SIZE,
};
pub use crate::services::sort::{sort_flights, SortDirection, SortField};

pub use crate::store::{
    FlightSearchEngine, InMemorySessionStore, OfferSource, SessionStore, StoreError, StoreResult,
    DEFAULT_MAX_RESULTS,
};
