//! Shared fixture builders for integration tests.

use chrono::NaiveDate;
use std::collections::HashMap;

use farescope::api::{
    Itinerary, OfferBatch, OfferPrice, RawOffer, SearchParams, Segment, SegmentEndpoint,
};

/// Builder for one raw offer with the knobs the pipeline cares about.
pub struct OfferSpec {
    pub id: &'static str,
    pub price: f64,
    pub stops: usize,
    pub carrier: &'static str,
    pub dep_hour: u32,
    pub arr_hour: u32,
    pub duration: &'static str,
}

impl OfferSpec {
    pub fn build(&self) -> RawOffer {
        let dep = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(self.dep_hour, 0, 0)
            .unwrap();
        let arr = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(self.arr_hour, 15, 0)
            .unwrap();

        let mut segments = Vec::new();
        for leg in 0..=self.stops {
            segments.push(Segment {
                departure: SegmentEndpoint {
                    iata_code: if leg == 0 { "MAD" } else { "HUB" }.to_string(),
                    at: dep,
                },
                arrival: SegmentEndpoint {
                    iata_code: if leg == self.stops { "JFK" } else { "HUB" }.to_string(),
                    at: arr,
                },
                carrier_code: self.carrier.to_string(),
                number: format!("{}{}", self.carrier, 400 + leg),
            });
        }

        RawOffer {
            id: self.id.to_string(),
            itineraries: vec![Itinerary {
                duration: self.duration.to_string(),
                segments,
            }],
            price: OfferPrice {
                total: format!("{:.2}", self.price),
                currency: "EUR".to_string(),
            },
        }
    }
}

/// A varied nine-offer inventory covering all stop buckets, three carriers,
/// morning/afternoon/evening departures, and a broad price spread.
pub fn varied_batch() -> OfferBatch {
    let specs = [
        OfferSpec { id: "v1", price: 95.50, stops: 0, carrier: "IB", dep_hour: 6, arr_hour: 9, duration: "PT3H15M" },
        OfferSpec { id: "v2", price: 142.00, stops: 1, carrier: "UX", dep_hour: 9, arr_hour: 15, duration: "PT6H15M" },
        OfferSpec { id: "v3", price: 188.30, stops: 0, carrier: "LH", dep_hour: 11, arr_hour: 14, duration: "PT3H15M" },
        OfferSpec { id: "v4", price: 203.75, stops: 2, carrier: "IB", dep_hour: 13, arr_hour: 22, duration: "PT9H15M" },
        OfferSpec { id: "v5", price: 260.00, stops: 1, carrier: "LH", dep_hour: 15, arr_hour: 20, duration: "PT5H15M" },
        OfferSpec { id: "v6", price: 305.10, stops: 0, carrier: "UX", dep_hour: 17, arr_hour: 20, duration: "PT3H15M" },
        OfferSpec { id: "v7", price: 377.40, stops: 2, carrier: "LH", dep_hour: 19, arr_hour: 23, duration: "PT4H15M" },
        OfferSpec { id: "v8", price: 410.90, stops: 1, carrier: "IB", dep_hour: 21, arr_hour: 23, duration: "PT2H15M" },
        OfferSpec { id: "v9", price: 455.00, stops: 0, carrier: "UX", dep_hour: 23, arr_hour: 2, duration: "PT3H15M" },
    ];

    OfferBatch::new(
        specs.iter().map(OfferSpec::build).collect(),
        HashMap::from([
            ("IB".to_string(), "Iberia".to_string()),
            ("UX".to_string(), "Air Europa".to_string()),
            ("LH".to_string(), "Lufthansa".to_string()),
        ]),
    )
}

/// A batch of `count` offers with a linear price ramp, all non-stop.
pub fn ramp_batch(count: usize) -> OfferBatch {
    let offers = (0..count)
        .map(|i| {
            let mut offer = OfferSpec {
                id: "r",
                price: 100.0 + i as f64 * 7.0,
                stops: 0,
                carrier: "IB",
                dep_hour: 8,
                arr_hour: 11,
                duration: "PT3H",
            }
            .build();
            offer.id = format!("r{}", i);
            offer
        })
        .collect();

    OfferBatch::new(
        offers,
        HashMap::from([("IB".to_string(), "Iberia".to_string())]),
    )
}

pub fn search_params() -> SearchParams {
    SearchParams::new(
        "MAD",
        "JFK",
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        1,
    )
}
