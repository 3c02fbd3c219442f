//! Interactive search session.
//!
//! A [`SearchSession`] is the single owner of the interactive state for one
//! search: the filter predicate, the sort selection, and the page index. Every
//! read goes through [`SearchSession::view`], a pure derivation over the
//! normalized batch cached by input digest, with explicit invalidation when an
//! upstream input changes. [`SessionManager`] holds live sessions for the HTTP
//! surface.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{OfferBatch, SearchKey, SearchParams};
use crate::services::filter::{
    apply_filters, filter_options, FilterDefaults, FilterOptions, FilterState,
};
use crate::services::normalizer::{normalize_batch, ProcessedFlight};
use crate::services::price_trend::{aggregate_price_trend, PriceTrend};
use crate::services::sort::{sort_flights, SortDirection, SortField};
use crate::store::{input_digest, DerivedCache, FlightSearchEngine, SessionStore, StoreResult};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Persisted-store key for the most recent search.
const LAST_SEARCH_KEY: &str = "last_search";

/// Everything the display layer reads for one page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultsView {
    pub page_flights: Vec<ProcessedFlight>,
    pub total_filtered_count: usize,
    pub price_trend: PriceTrend,
    pub filter_options: FilterOptions,
    pub has_active_filters: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
}

/// Derivation inputs, serialized into the digest that keys the derived cache.
#[derive(Serialize)]
struct ViewInputs<'a> {
    key: &'a str,
    filters: &'a FilterState,
    sort_field: SortField,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

/// Pure derivation of the display view from the normalized set and the
/// session's interactive state.
fn derive_view(
    flights: &[ProcessedFlight],
    filters: &FilterState,
    defaults: &FilterDefaults,
    sort_field: SortField,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
) -> SearchResultsView {
    let filtered = apply_filters(flights, filters);
    let sorted = sort_flights(&filtered, sort_field, sort_direction);

    let total = sorted.len();
    let total_pages = total.div_ceil(page_size);
    let current_page = page.clamp(1, total_pages.max(1));

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total);
    let page_flights = if start < total {
        sorted[start..end].to_vec()
    } else {
        Vec::new()
    };

    let price_trend = aggregate_price_trend(flights, &sorted);

    SearchResultsView {
        page_flights,
        total_filtered_count: total,
        price_trend,
        filter_options: filter_options(flights),
        has_active_filters: filters.has_active_filters(defaults),
        current_page,
        total_pages,
        has_next_page: current_page < total_pages,
    }
}

/// One interactive search: normalized batch plus the user-owned state.
pub struct SearchSession {
    params: SearchParams,
    key: SearchKey,
    flights: Vec<ProcessedFlight>,
    carriers: HashMap<String, String>,
    defaults: FilterDefaults,
    filters: FilterState,
    sort_field: SortField,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
    derived: DerivedCache<SearchResultsView>,
}

impl SearchSession {
    /// Build a session from a freshly fetched batch.
    ///
    /// Offers that fail normalization are dropped and logged; one bad offer
    /// never takes down the batch.
    pub fn new(params: SearchParams, batch: &OfferBatch, page_size: usize) -> Self {
        let key = params.cache_key();
        let (flights, errors) = normalize_batch(&batch.offers);
        for error in &errors {
            log::warn!("dropping offer: {}", error);
        }
        let defaults = FilterDefaults::from_flights(&flights);

        Self {
            params,
            key,
            carriers: batch.carriers.clone(),
            filters: FilterState::unfiltered(&defaults),
            defaults,
            flights,
            sort_field: SortField::Price,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size,
            derived: DerivedCache::new(),
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn search_key(&self) -> &SearchKey {
        &self.key
    }

    /// Carrier display names from the provider response.
    pub fn carriers(&self) -> &HashMap<String, String> {
        &self.carriers
    }

    pub fn flights(&self) -> &[ProcessedFlight] {
        &self.flights
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Point the session at a new search. The page index resets only here, on
    /// an actual key change; the batch arrives later via [`install_batch`].
    ///
    /// [`install_batch`]: SearchSession::install_batch
    pub fn set_search(&mut self, params: SearchParams) {
        let key = params.cache_key();
        if key != self.key {
            self.key = key;
            self.page = 1;
            self.flights.clear();
            self.carriers.clear();
            self.defaults = FilterDefaults::from_flights(&self.flights);
            self.filters = FilterState::unfiltered(&self.defaults);
            self.derived.clear();
        }
        self.params = params;
    }

    /// Apply a fetched batch, unless it is stale.
    ///
    /// Fetches are tagged with the key they were issued for; a result for a
    /// key the session has moved past is discarded, never applied to the
    /// newer key's state. Returns whether the batch was applied.
    pub fn install_batch(&mut self, key: &SearchKey, batch: &OfferBatch) -> bool {
        if *key != self.key {
            log::debug!("discarding stale batch for {}", key);
            return false;
        }

        let (flights, errors) = normalize_batch(&batch.offers);
        for error in &errors {
            log::warn!("dropping offer: {}", error);
        }
        self.defaults = FilterDefaults::from_flights(&flights);
        self.filters = FilterState::unfiltered(&self.defaults);
        self.flights = flights;
        self.carriers = batch.carriers.clone();
        self.page = 1;
        self.derived.clear();
        true
    }

    /// Replace the filter predicate. Validation happens when the caller
    /// constructs the `FilterState`; by this point the state is well-formed.
    pub fn set_filters(&mut self, filters: FilterState) {
        if filters != self.filters {
            self.filters = filters;
            self.derived.clear();
        }
    }

    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        if field != self.sort_field || direction != self.sort_direction {
            self.sort_field = field;
            self.sort_direction = direction;
            self.derived.clear();
        }
    }

    /// Request a page. The index is clamped against the current filtered set
    /// size at view time, never silently reset to 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// No-op defaults for the current batch, for building filter states.
    pub fn filter_defaults(&self) -> &FilterDefaults {
        &self.defaults
    }

    fn digest_for_page(&self, page: usize) -> String {
        input_digest(&ViewInputs {
            key: self.key.as_str(),
            filters: &self.filters,
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            page,
            page_size: self.page_size,
        })
    }

    /// Current view of the results, cached by input digest.
    ///
    /// Entering a page eagerly warms the derivation for the following page so
    /// forward navigation is latency-free.
    pub fn view(&mut self) -> SearchResultsView {
        let digest = self.digest_for_page(self.page);
        let view = match self.derived.get(&digest) {
            Some(view) => view,
            None => {
                let view = derive_view(
                    &self.flights,
                    &self.filters,
                    &self.defaults,
                    self.sort_field,
                    self.sort_direction,
                    self.page,
                    self.page_size,
                );
                self.derived.insert(digest, view.clone());
                view
            }
        };

        // Feed the clamp back so subsequent navigation starts from the page
        // actually shown.
        self.page = view.current_page;
        self.warm_next_page(&view);
        view
    }

    /// Advisory prefetch of the next page's derivation.
    fn warm_next_page(&mut self, view: &SearchResultsView) {
        if !view.has_next_page {
            return;
        }
        let next = view.current_page + 1;
        let digest = self.digest_for_page(next);
        if self.derived.contains(&digest) {
            return;
        }
        let warmed = derive_view(
            &self.flights,
            &self.filters,
            &self.defaults,
            self.sort_field,
            self.sort_direction,
            next,
            self.page_size,
        );
        self.derived.insert(digest, warmed);
    }

    /// Number of derived views currently cached (diagnostics and tests).
    pub fn derived_cache_len(&self) -> usize {
        self.derived.len()
    }
}

/// Live sessions keyed by id, for the HTTP surface.
#[derive(Clone)]
pub struct SessionManager {
    engine: Arc<FlightSearchEngine>,
    store: Arc<dyn SessionStore>,
    sessions: Arc<RwLock<HashMap<String, SearchSession>>>,
    page_size: usize,
}

impl SessionManager {
    pub fn new(
        engine: Arc<FlightSearchEngine>,
        store: Arc<dyn SessionStore>,
        page_size: usize,
    ) -> Self {
        Self {
            engine,
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            page_size,
        }
    }

    pub fn engine(&self) -> &FlightSearchEngine {
        &self.engine
    }

    /// Fetch (or reuse the cached batch for) a search and open a session.
    pub async fn create_session(
        &self,
        params: SearchParams,
    ) -> StoreResult<(String, SearchResultsView)> {
        let batch = self.engine.load(&params).await?;

        if let Ok(value) = serde_json::to_value(&params) {
            self.store.save(LAST_SEARCH_KEY, value);
        }

        let mut session = SearchSession::new(params, &batch, self.page_size);
        let view = session.view();

        let session_id = Uuid::new_v4().to_string();
        self.sessions.write().insert(session_id.clone(), session);
        Ok((session_id, view))
    }

    /// Run a closure against a session. Returns `None` for unknown ids.
    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SearchSession) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write();
        sessions.get_mut(session_id).map(f)
    }

    pub fn remove_session(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    /// The most recently created search, restored from the persisted store.
    pub fn last_search(&self) -> Option<SearchParams> {
        let value = self.store.load(LAST_SEARCH_KEY)?;
        serde_json::from_value(value).ok()
    }
}
