#[cfg(test)]
mod tests {
    use crate::models::{
        Itinerary, OfferBatch, OfferPrice, RawOffer, SearchParams, Segment, SegmentEndpoint,
    };
    use crate::services::filter::{RangeFilter, StopCategory};
    use crate::services::session::{SearchSession, SessionManager, DEFAULT_PAGE_SIZE};
    use crate::services::sort::{SortDirection, SortField};
    use crate::store::{
        FlightSearchEngine, InMemorySessionStore, OfferSource, SessionStore, StoreResult,
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn make_offer(id: &str, price: f64, stops: usize, dep_hour: u32) -> RawOffer {
        let dep = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(dep_hour, 0, 0)
            .unwrap();
        let arr = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt((dep_hour + 3).min(23), 0, 0)
            .unwrap();

        let mut segments = Vec::new();
        for leg in 0..=stops {
            segments.push(Segment {
                departure: SegmentEndpoint {
                    iata_code: if leg == 0 { "MAD" } else { "HUB" }.to_string(),
                    at: dep,
                },
                arrival: SegmentEndpoint {
                    iata_code: if leg == stops { "JFK" } else { "HUB" }.to_string(),
                    at: arr,
                },
                carrier_code: "IB".to_string(),
                number: format!("IB{}", 100 + leg),
            });
        }

        RawOffer {
            id: id.to_string(),
            itineraries: vec![Itinerary {
                duration: "PT5H".to_string(),
                segments,
            }],
            price: OfferPrice {
                total: format!("{:.2}", price),
                currency: "EUR".to_string(),
            },
        }
    }

    fn batch(count: usize) -> OfferBatch {
        let offers = (0..count)
            .map(|i| make_offer(&format!("o{}", i), 100.0 + i as f64 * 10.0, i % 3, 8))
            .collect();
        OfferBatch::new(
            offers,
            HashMap::from([("IB".to_string(), "Iberia".to_string())]),
        )
    }

    fn params() -> SearchParams {
        SearchParams::new(
            "MAD",
            "JFK",
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            1,
        )
    }

    #[test]
    fn test_pagination_window_scenario() {
        // 23 filtered flights at page size 10: 3 pages, 3 flights on the last.
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);

        let view = session.view();
        assert_eq!(view.total_filtered_count, 23);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.page_flights.len(), 10);
        assert!(view.has_next_page);

        session.set_page(3);
        let last = session.view();
        assert_eq!(last.page_flights.len(), 3);
        assert!(!last.has_next_page);
    }

    #[test]
    fn test_pages_concatenate_to_full_sorted_sequence() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);

        let mut seen = Vec::new();
        for page in 1..=3 {
            session.set_page(page);
            let view = session.view();
            seen.extend(view.page_flights.iter().map(|f| f.id.clone()));
        }

        // Default sort is price ascending, which matches the seeded price
        // ramp, so the concatenation must reproduce the input order exactly.
        let expected: Vec<String> = session.flights().iter().map(|f| f.id.clone()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_page_clamps_when_filters_narrow() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);
        session.set_page(3);
        assert_eq!(session.view().current_page, 3);

        // Narrow to the 5 cheapest flights; page 3 no longer exists.
        let filters = session
            .filters()
            .clone()
            .with_price(RangeFilter::new(100.0, 140.0, "price").unwrap());
        session.set_filters(filters);

        let view = session.view();
        assert_eq!(view.total_filtered_count, 5);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.current_page, 1);
    }

    #[test]
    fn test_page_survives_filter_change_when_still_valid() {
        let mut session = SearchSession::new(params(), &batch(30), DEFAULT_PAGE_SIZE);
        session.set_page(2);
        assert_eq!(session.view().current_page, 2);

        // Drop 5 flights; 25 remain, so page 2 is still in range and must not
        // silently reset to 1.
        let filters = session
            .filters()
            .clone()
            .with_price(RangeFilter::new(150.0, 1000.0, "price").unwrap());
        session.set_filters(filters);

        let view = session.view();
        assert_eq!(view.total_filtered_count, 25);
        assert_eq!(view.current_page, 2);
    }

    #[test]
    fn test_key_change_resets_page() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);
        session.set_page(2);
        session.view();

        let mut other = params();
        other.destination = "LHR".to_string();
        session.set_search(other);
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_same_key_keeps_page() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);
        session.set_page(2);
        session.view();

        // Same key (max_results is not part of it): nothing resets.
        let mut same = params();
        same.max_results = Some(40);
        session.set_search(same);
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_stale_batch_is_discarded() {
        let mut session = SearchSession::new(params(), &batch(5), DEFAULT_PAGE_SIZE);
        let stale_key = params().cache_key();

        let mut other = params();
        other.destination = "LHR".to_string();
        session.set_search(other);

        // The fetch issued for the old key completes after the key moved on.
        let applied = session.install_batch(&stale_key, &batch(23));
        assert!(!applied);
        assert!(session.flights().is_empty());
    }

    #[test]
    fn test_matching_batch_installs() {
        let mut session = SearchSession::new(params(), &batch(0), DEFAULT_PAGE_SIZE);
        let key = params().cache_key();

        let applied = session.install_batch(&key, &batch(7));
        assert!(applied);
        assert_eq!(session.flights().len(), 7);
        assert_eq!(session.view().total_filtered_count, 7);
    }

    #[test]
    fn test_bad_offers_are_dropped_not_fatal() {
        let mut b = batch(3);
        b.offers.push(RawOffer {
            id: "broken".to_string(),
            itineraries: vec![],
            price: OfferPrice {
                total: "99.00".to_string(),
                currency: "EUR".to_string(),
            },
        });

        let mut session = SearchSession::new(params(), &b, DEFAULT_PAGE_SIZE);
        assert_eq!(session.flights().len(), 3);
        assert_eq!(session.view().total_filtered_count, 3);
    }

    #[test]
    fn test_view_caches_and_prefetches_next_page() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);

        let first = session.view();
        // Page 1 plus the warmed page 2.
        assert_eq!(session.derived_cache_len(), 2);

        // A second read is a pure cache hit.
        let again = session.view();
        assert_eq!(first, again);
        assert_eq!(session.derived_cache_len(), 2);

        // Navigating forward lands on the warmed entry, then warms page 3.
        session.next_page();
        session.view();
        assert_eq!(session.derived_cache_len(), 3);
    }

    #[test]
    fn test_last_page_does_not_warm_beyond_end() {
        let mut session = SearchSession::new(params(), &batch(5), DEFAULT_PAGE_SIZE);
        session.view();
        assert_eq!(session.derived_cache_len(), 1);
    }

    #[test]
    fn test_state_change_invalidates_derived_views() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);
        session.view();
        assert!(session.derived_cache_len() > 0);

        session.set_sort(SortField::Departure, SortDirection::Desc);
        assert_eq!(session.derived_cache_len(), 0);
    }

    #[test]
    fn test_unchanged_state_keeps_derived_views() {
        let mut session = SearchSession::new(params(), &batch(23), DEFAULT_PAGE_SIZE);
        session.view();
        let cached = session.derived_cache_len();

        // Re-applying the identical sort and filters is not a change.
        session.set_sort(SortField::Price, SortDirection::Asc);
        session.set_filters(session.filters().clone());
        assert_eq!(session.derived_cache_len(), cached);
    }

    #[test]
    fn test_requested_page_zero_clamps_to_one() {
        let mut session = SearchSession::new(params(), &batch(5), DEFAULT_PAGE_SIZE);
        session.set_page(0);
        assert_eq!(session.view().current_page, 1);
    }

    #[test]
    fn test_empty_batch_view_is_well_formed() {
        let mut session = SearchSession::new(params(), &batch(0), DEFAULT_PAGE_SIZE);
        let view = session.view();

        assert_eq!(view.total_filtered_count, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.current_page, 1);
        assert!(view.page_flights.is_empty());
        assert!(view.price_trend.points.is_empty());
        assert!(!view.has_next_page);
        assert!(!view.has_active_filters);
    }

    #[test]
    fn test_stops_filter_flows_through_view() {
        let mut session = SearchSession::new(params(), &batch(9), DEFAULT_PAGE_SIZE);
        let filters = session
            .filters()
            .clone()
            .with_stops([StopCategory::NonStop].into());
        session.set_filters(filters);

        let view = session.view();
        // Seeded stops cycle 0,1,2: a third of the batch is non-stop.
        assert_eq!(view.total_filtered_count, 3);
        assert!(view.has_active_filters);
        // The chart keeps the full set in its all-counts.
        let all_sum: usize = view.price_trend.points.iter().map(|p| p.all_count).sum();
        assert_eq!(all_sum, 9);
    }

    // ---- SessionManager ----

    struct CannedSource {
        batch: OfferBatch,
    }

    #[async_trait::async_trait]
    impl OfferSource for CannedSource {
        async fn fetch_offers(&self, _params: &SearchParams) -> StoreResult<OfferBatch> {
            Ok(self.batch.clone())
        }
    }

    fn manager(count: usize) -> SessionManager {
        let engine = Arc::new(FlightSearchEngine::new(
            Arc::new(CannedSource { batch: batch(count) }),
            600,
        ));
        SessionManager::new(engine, Arc::new(InMemorySessionStore::new()), DEFAULT_PAGE_SIZE)
    }

    #[tokio::test]
    async fn test_manager_creates_session_with_view() {
        let manager = manager(12);
        let (session_id, view) = manager.create_session(params()).await.unwrap();

        assert_eq!(view.total_filtered_count, 12);
        assert_eq!(view.total_pages, 2);

        let carriers = manager
            .with_session(&session_id, |s| s.carriers().clone())
            .unwrap();
        assert_eq!(carriers.get("IB").map(String::as_str), Some("Iberia"));
    }

    #[tokio::test]
    async fn test_manager_unknown_session_is_none() {
        let manager = manager(3);
        assert!(manager.with_session("nope", |s| s.current_page()).is_none());
    }

    #[tokio::test]
    async fn test_manager_persists_last_search() {
        let manager = manager(3);
        assert!(manager.last_search().is_none());

        manager.create_session(params()).await.unwrap();
        let restored = manager.last_search().unwrap();
        assert_eq!(restored, params());
    }

    #[tokio::test]
    async fn test_manager_remove_session() {
        let manager = manager(3);
        let (session_id, _) = manager.create_session(params()).await.unwrap();

        manager.remove_session(&session_id);
        assert!(manager.with_session(&session_id, |_| ()).is_none());
    }

    #[test]
    fn test_store_round_trip_for_search_params() {
        // The persisted-store seam carries SearchParams losslessly.
        let store = InMemorySessionStore::new();
        store.save("last_search", serde_json::to_value(params()).unwrap());
        let restored: SearchParams =
            serde_json::from_value(store.load("last_search").unwrap()).unwrap();
        assert_eq!(restored, params());
    }
}
