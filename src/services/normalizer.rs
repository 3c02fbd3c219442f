//! Offer normalization.
//!
//! Converts one raw provider offer into a [`ProcessedFlight`] carrying the
//! derived scalar fields every downstream stage consumes. Normalization is
//! deterministic and side-effect free; malformed offers fail fast with a
//! per-offer error so one bad record never poisons the batch.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::RawOffer;
use crate::services::filter::StopCategory;

/// Error for a single offer that could not be normalized.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("offer {offer_id}: no itineraries")]
    MissingItineraries { offer_id: String },

    #[error("offer {offer_id}: itinerary has no segments")]
    EmptySegments { offer_id: String },

    #[error("offer {offer_id}: invalid duration '{value}'")]
    InvalidDuration { offer_id: String, value: String },

    #[error("offer {offer_id}: invalid price '{value}'")]
    InvalidPrice { offer_id: String, value: String },
}

/// Derived flight model, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFlight {
    /// Unique id carried over from the raw offer.
    pub id: String,
    pub price: f64,
    pub currency: String,
    /// Total duration in minutes, summed across all itineraries.
    pub total_duration_minutes: i64,
    /// Stop count of the first itinerary only (segments - 1).
    pub total_stops: usize,
    /// Carrier code of the first segment of the first itinerary.
    pub main_airline: String,
    /// Departure instant of the first segment of the first itinerary.
    pub departure_at: NaiveDateTime,
    /// Arrival instant of the last segment of the first itinerary.
    pub arrival_at: NaiveDateTime,
    /// Original raw offer, for display-only use outside the core.
    pub offer: RawOffer,
}

impl ProcessedFlight {
    /// Departure hour of day (0-23) in the airport's local time.
    pub fn departure_hour(&self) -> u32 {
        self.departure_at.hour()
    }

    /// Arrival hour of day (0-23) in the airport's local time.
    pub fn arrival_hour(&self) -> u32 {
        self.arrival_at.hour()
    }

    pub fn stop_category(&self) -> StopCategory {
        StopCategory::of(self.total_stops)
    }
}

/// Parse an ISO-8601 style duration such as `"PT21H35M"` into minutes.
///
/// Accepts hour-only (`"PT3H"`) and minute-only (`"PT45M"`) forms. Anything
/// else is malformed input from the provider.
pub fn parse_iso_duration(value: &str) -> Option<i64> {
    let rest = value.strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut minutes: i64 = 0;
    let mut digits = String::new();
    for ch in rest.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            'H' => {
                let hours: i64 = digits.parse().ok()?;
                minutes += hours * 60;
                digits.clear();
            }
            'M' => {
                let m: i64 = digits.parse().ok()?;
                minutes += m;
                digits.clear();
            }
            _ => return None,
        }
    }
    // Trailing digits without a unit mean a truncated string.
    if !digits.is_empty() {
        return None;
    }
    Some(minutes)
}

/// Normalize one raw offer into a [`ProcessedFlight`].
pub fn normalize(raw: &RawOffer) -> Result<ProcessedFlight, NormalizeError> {
    let first_itinerary =
        raw.itineraries
            .first()
            .ok_or_else(|| NormalizeError::MissingItineraries {
                offer_id: raw.id.clone(),
            })?;

    let first_segment =
        first_itinerary
            .segments
            .first()
            .ok_or_else(|| NormalizeError::EmptySegments {
                offer_id: raw.id.clone(),
            })?;
    // first() succeeded, so last() cannot fail; still avoid unwrap.
    let last_segment =
        first_itinerary
            .segments
            .last()
            .ok_or_else(|| NormalizeError::EmptySegments {
                offer_id: raw.id.clone(),
            })?;

    let price: f64 =
        raw.price
            .total
            .trim()
            .parse()
            .map_err(|_| NormalizeError::InvalidPrice {
                offer_id: raw.id.clone(),
                value: raw.price.total.clone(),
            })?;

    // Duration sums across every itinerary, not just the first.
    let mut total_duration_minutes: i64 = 0;
    for itinerary in &raw.itineraries {
        let minutes = parse_iso_duration(&itinerary.duration).ok_or_else(|| {
            NormalizeError::InvalidDuration {
                offer_id: raw.id.clone(),
                value: itinerary.duration.clone(),
            }
        })?;
        total_duration_minutes += minutes;
    }

    Ok(ProcessedFlight {
        id: raw.id.clone(),
        price,
        currency: raw.price.currency.clone(),
        total_duration_minutes,
        total_stops: first_itinerary.segments.len() - 1,
        main_airline: first_segment.carrier_code.clone(),
        departure_at: first_segment.departure.at,
        arrival_at: last_segment.arrival.at,
        offer: raw.clone(),
    })
}

/// Normalize a batch, dropping offers that fail and reporting why.
///
/// This implements the drop-the-offender policy: the caller receives every
/// flight that normalized cleanly plus the errors for those that did not.
pub fn normalize_batch(offers: &[RawOffer]) -> (Vec<ProcessedFlight>, Vec<NormalizeError>) {
    let mut flights = Vec::with_capacity(offers.len());
    let mut errors = Vec::new();
    for raw in offers {
        match normalize(raw) {
            Ok(flight) => flights.push(flight),
            Err(e) => errors.push(e),
        }
    }
    (flights, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Itinerary, OfferPrice, Segment, SegmentEndpoint};
    use chrono::NaiveDate;

    fn endpoint(code: &str, day: u32, hour: u32, minute: u32) -> SegmentEndpoint {
        SegmentEndpoint {
            iata_code: code.to_string(),
            at: NaiveDate::from_ymd_opt(2026, 9, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        }
    }

    fn segment(carrier: &str, from: SegmentEndpoint, to: SegmentEndpoint) -> Segment {
        Segment {
            departure: from,
            arrival: to,
            carrier_code: carrier.to_string(),
            number: "100".to_string(),
        }
    }

    fn offer(id: &str, itineraries: Vec<Itinerary>, total: &str) -> RawOffer {
        RawOffer {
            id: id.to_string(),
            itineraries,
            price: OfferPrice {
                total: total.to_string(),
                currency: "EUR".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration("PT21H35M"), Some(21 * 60 + 35));
        assert_eq!(parse_iso_duration("PT3H"), Some(180));
        assert_eq!(parse_iso_duration("PT45M"), Some(45));
        assert_eq!(parse_iso_duration("PT0M"), Some(0));
    }

    #[test]
    fn test_parse_iso_duration_rejects_malformed() {
        assert_eq!(parse_iso_duration(""), None);
        assert_eq!(parse_iso_duration("PT"), None);
        assert_eq!(parse_iso_duration("21H35M"), None);
        assert_eq!(parse_iso_duration("PT21H35"), None);
        assert_eq!(parse_iso_duration("PT1H30S"), None);
    }

    #[test]
    fn test_normalize_single_leg() {
        let raw = offer(
            "o1",
            vec![Itinerary {
                duration: "PT2H15M".to_string(),
                segments: vec![segment("IB", endpoint("MAD", 1, 10, 20), endpoint("LIS", 1, 12, 35))],
            }],
            "120.00",
        );

        let flight = normalize(&raw).expect("should normalize");
        assert_eq!(flight.id, "o1");
        assert_eq!(flight.price, 120.0);
        assert_eq!(flight.total_duration_minutes, 135);
        assert_eq!(flight.total_stops, 0);
        assert_eq!(flight.main_airline, "IB");
        assert_eq!(flight.departure_hour(), 10);
        assert_eq!(flight.arrival_hour(), 12);
    }

    #[test]
    fn test_normalize_sums_duration_across_itineraries() {
        let raw = offer(
            "o2",
            vec![
                Itinerary {
                    duration: "PT8H".to_string(),
                    segments: vec![segment(
                        "UX",
                        endpoint("MAD", 1, 9, 0),
                        endpoint("JFK", 1, 17, 0),
                    )],
                },
                Itinerary {
                    duration: "PT7H30M".to_string(),
                    segments: vec![segment(
                        "UX",
                        endpoint("JFK", 8, 18, 0),
                        endpoint("MAD", 9, 7, 30),
                    )],
                },
            ],
            "640.10",
        );

        let flight = normalize(&raw).expect("should normalize");
        assert_eq!(flight.total_duration_minutes, 8 * 60 + 7 * 60 + 30);
        // Stop count comes from the first itinerary only.
        assert_eq!(flight.total_stops, 0);
    }

    #[test]
    fn test_normalize_stop_count_and_endpoints() {
        let raw = offer(
            "o3",
            vec![Itinerary {
                duration: "PT11H".to_string(),
                segments: vec![
                    segment("LH", endpoint("MAD", 1, 7, 0), endpoint("FRA", 1, 9, 30)),
                    segment("LH", endpoint("FRA", 1, 11, 0), endpoint("JFK", 1, 14, 0)),
                ],
            }],
            "501.99",
        );

        let flight = normalize(&raw).expect("should normalize");
        assert_eq!(flight.total_stops, 1);
        assert_eq!(flight.main_airline, "LH");
        assert_eq!(flight.departure_hour(), 7);
        // Arrival taken from the last segment of the first itinerary.
        assert_eq!(flight.arrival_hour(), 14);
    }

    #[test]
    fn test_normalize_rejects_missing_itineraries() {
        let raw = offer("bad", vec![], "99.00");
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingItineraries { .. }));
    }

    #[test]
    fn test_normalize_rejects_empty_segments() {
        let raw = offer(
            "bad",
            vec![Itinerary {
                duration: "PT1H".to_string(),
                segments: vec![],
            }],
            "99.00",
        );
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::EmptySegments { .. }));
    }

    #[test]
    fn test_normalize_rejects_bad_price() {
        let raw = offer(
            "bad",
            vec![Itinerary {
                duration: "PT1H".to_string(),
                segments: vec![segment("IB", endpoint("MAD", 1, 8, 0), endpoint("LIS", 1, 9, 0))],
            }],
            "not-a-number",
        );
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidPrice { .. }));
    }

    #[test]
    fn test_normalize_batch_drops_offenders() {
        let good = offer(
            "good",
            vec![Itinerary {
                duration: "PT1H".to_string(),
                segments: vec![segment("IB", endpoint("MAD", 1, 8, 0), endpoint("LIS", 1, 9, 0))],
            }],
            "80.00",
        );
        let bad = offer("bad", vec![], "80.00");

        let (flights, errors) = normalize_batch(&[good, bad]);
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].id, "good");
        assert_eq!(errors.len(), 1);
    }
}
