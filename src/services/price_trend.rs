//! Price histogram aggregation.
//!
//! Buckets the all-flights and filtered-flights price sets into fixed-width
//! bins for the price chart and computes summary statistics over the filtered
//! set. Degenerate inputs (empty sets) produce empty buckets and zero-valued
//! statistics rather than NaN or infinities.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::normalizer::ProcessedFlight;

/// Fixed histogram bucket width in currency units.
pub const PRICE_BUCKET_WIDTH: f64 = 50.0;

/// One histogram bucket, identified by its start price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bucket start (inclusive lower edge).
    pub price: f64,
    pub all_count: usize,
    pub filtered_count: usize,
}

/// Histogram plus summary statistics over the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub points: Vec<PricePoint>,
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
}

impl PriceTrend {
    /// Empty trend: no buckets, zero statistics.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            lowest: 0.0,
            highest: 0.0,
            average: 0.0,
        }
    }
}

fn bucket_start(price: f64) -> i64 {
    ((price / PRICE_BUCKET_WIDTH).floor() as i64) * PRICE_BUCKET_WIDTH as i64
}

fn count_buckets(flights: &[ProcessedFlight]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for flight in flights {
        *counts.entry(bucket_start(flight.price)).or_insert(0) += 1;
    }
    counts
}

/// Bucket both price sets and compute statistics over the filtered set.
///
/// The bucket range derives from the all-flights set: one bucket per
/// `PRICE_BUCKET_WIDTH`-sized step from `floor(min)` to `ceil(max)` inclusive.
/// An empty all-flights set yields an empty bucket sequence; an empty filtered
/// set alone still yields buckets with zero filtered counts.
pub fn aggregate_price_trend(
    all_flights: &[ProcessedFlight],
    filtered_flights: &[ProcessedFlight],
) -> PriceTrend {
    if all_flights.is_empty() {
        return PriceTrend::empty();
    }

    let mut min_price = f64::INFINITY;
    let mut max_price = f64::NEG_INFINITY;
    for flight in all_flights {
        min_price = min_price.min(flight.price);
        max_price = max_price.max(flight.price);
    }

    let width = PRICE_BUCKET_WIDTH as i64;
    let floor = ((min_price / PRICE_BUCKET_WIDTH).floor() as i64) * width;
    let ceiling = ((max_price / PRICE_BUCKET_WIDTH).ceil() as i64) * width;

    let all_counts = count_buckets(all_flights);
    let filtered_counts = count_buckets(filtered_flights);

    let mut points = Vec::new();
    let mut start = floor;
    while start <= ceiling {
        points.push(PricePoint {
            price: start as f64,
            all_count: all_counts.get(&start).copied().unwrap_or(0),
            filtered_count: filtered_counts.get(&start).copied().unwrap_or(0),
        });
        start += width;
    }

    // Statistics are computed strictly over the filtered set; an empty set
    // reports zeros by policy, not an error.
    let (lowest, highest, average) = if filtered_flights.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let mut lowest = f64::INFINITY;
        let mut highest = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for flight in filtered_flights {
            lowest = lowest.min(flight.price);
            highest = highest.max(flight.price);
            sum += flight.price;
        }
        (lowest, highest, sum / filtered_flights.len() as f64)
    };

    PriceTrend {
        points,
        lowest,
        highest,
        average,
    }
}
