//! Flight ordering.
//!
//! Sorting produces a new sequence and never mutates its input. The ascending
//! order uses a stable sort so flights with equal keys keep their relative
//! input order; descending is the exact reverse of the ascending order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::services::normalizer::ProcessedFlight;

/// Comparable field selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Price,
    Duration,
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

fn compare(a: &ProcessedFlight, b: &ProcessedFlight, field: SortField) -> Ordering {
    match field {
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Duration => a.total_duration_minutes.cmp(&b.total_duration_minutes),
        SortField::Departure => a.departure_at.cmp(&b.departure_at),
    }
}

/// Order a flight collection by one field and a direction.
///
/// No secondary tie-break is applied.
pub fn sort_flights(
    flights: &[ProcessedFlight],
    field: SortField,
    direction: SortDirection,
) -> Vec<ProcessedFlight> {
    let mut sorted = flights.to_vec();
    sorted.sort_by(|a, b| compare(a, b, field));
    if direction == SortDirection::Desc {
        sorted.reverse();
    }
    sorted
}
