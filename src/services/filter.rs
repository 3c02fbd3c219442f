//! Multi-dimensional flight filtering.
//!
//! A [`FilterState`] is a conjunction of six dimensions: price range, stop
//! categories, carriers, departure-hour range, arrival-hour range, and duration
//! range. Ranges are both-inclusive; multi-valued dimensions are OR within the
//! dimension and an empty selection imposes no constraint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::services::normalizer::ProcessedFlight;

/// Fallback price bounds when no flights are available to observe.
pub const FALLBACK_PRICE_RANGE: (f64, f64) = (0.0, 1000.0);
/// Fallback duration bounds (minutes) when no flights are available to observe.
pub const FALLBACK_DURATION_RANGE: (i64, i64) = (0, 1440);

/// Invalid filter bounds supplied by a caller.
///
/// These are precondition violations reported back to the caller, never
/// silently corrected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("{dimension} range is inverted: min > max")]
    InvertedRange { dimension: &'static str },

    #[error("{dimension} hour {value} is out of range (0-23)")]
    HourOutOfRange { dimension: &'static str, value: u32 },

    #[error("unknown stop category '{label}'")]
    UnknownStopCategory { label: String },
}

/// Stop-count bucket used for discrete stop filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StopCategory {
    #[serde(rename = "0")]
    NonStop,
    #[serde(rename = "1")]
    OneStop,
    #[serde(rename = "2+")]
    TwoPlus,
}

impl StopCategory {
    /// Map a stop count onto its bucket.
    pub fn of(stops: usize) -> Self {
        match stops {
            0 => StopCategory::NonStop,
            1 => StopCategory::OneStop,
            _ => StopCategory::TwoPlus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopCategory::NonStop => "0",
            StopCategory::OneStop => "1",
            StopCategory::TwoPlus => "2+",
        }
    }
}

impl std::str::FromStr for StopCategory {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(StopCategory::NonStop),
            "1" => Ok(StopCategory::OneStop),
            "2+" => Ok(StopCategory::TwoPlus),
            other => Err(FilterError::UnknownStopCategory {
                label: other.to_string(),
            }),
        }
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy> RangeFilter<T> {
    pub fn new(min: T, max: T, dimension: &'static str) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::InvertedRange { dimension });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Inclusive hour-of-day range, bounds in 0-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    min: u32,
    max: u32,
}

impl HourRange {
    pub fn new(min: u32, max: u32, dimension: &'static str) -> Result<Self, FilterError> {
        for value in [min, max] {
            if value > 23 {
                return Err(FilterError::HourOutOfRange { dimension, value });
            }
        }
        if min > max {
            return Err(FilterError::InvertedRange { dimension });
        }
        Ok(Self { min, max })
    }

    /// The no-op range covering the whole day.
    pub fn full_day() -> Self {
        Self { min: 0, max: 23 }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.min && hour <= self.max
    }

    pub fn is_full_day(&self) -> bool {
        self.min == 0 && self.max == 23
    }
}

/// Default (no-op) bounds observed over the full unfiltered flight set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterDefaults {
    pub price_range: (f64, f64),
    pub duration_range: (i64, i64),
}

impl FilterDefaults {
    /// Observe min/max price and duration over the full set, with fixed
    /// fallbacks when the set is empty.
    pub fn from_flights(flights: &[ProcessedFlight]) -> Self {
        if flights.is_empty() {
            return Self {
                price_range: FALLBACK_PRICE_RANGE,
                duration_range: FALLBACK_DURATION_RANGE,
            };
        }

        let mut price_min = f64::INFINITY;
        let mut price_max = f64::NEG_INFINITY;
        let mut duration_min = i64::MAX;
        let mut duration_max = i64::MIN;
        for flight in flights {
            price_min = price_min.min(flight.price);
            price_max = price_max.max(flight.price);
            duration_min = duration_min.min(flight.total_duration_minutes);
            duration_max = duration_max.max(flight.total_duration_minutes);
        }

        Self {
            price_range: (price_min, price_max),
            duration_range: (duration_min, duration_max),
        }
    }
}

/// The full filter predicate owned by an interactive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    price: RangeFilter<f64>,
    stops: BTreeSet<StopCategory>,
    airlines: BTreeSet<String>,
    departure_hours: HourRange,
    arrival_hours: HourRange,
    duration: RangeFilter<i64>,
}

impl FilterState {
    pub fn new(
        price: RangeFilter<f64>,
        stops: BTreeSet<StopCategory>,
        airlines: BTreeSet<String>,
        departure_hours: HourRange,
        arrival_hours: HourRange,
        duration: RangeFilter<i64>,
    ) -> Self {
        Self {
            price,
            stops,
            airlines,
            departure_hours,
            arrival_hours,
            duration,
        }
    }

    /// The no-op state for a given set of observed defaults: full ranges and
    /// empty discrete selections.
    pub fn unfiltered(defaults: &FilterDefaults) -> Self {
        Self {
            price: RangeFilter {
                min: defaults.price_range.0,
                max: defaults.price_range.1,
            },
            stops: BTreeSet::new(),
            airlines: BTreeSet::new(),
            departure_hours: HourRange::full_day(),
            arrival_hours: HourRange::full_day(),
            duration: RangeFilter {
                min: defaults.duration_range.0,
                max: defaults.duration_range.1,
            },
        }
    }

    pub fn price(&self) -> &RangeFilter<f64> {
        &self.price
    }

    pub fn stops(&self) -> &BTreeSet<StopCategory> {
        &self.stops
    }

    pub fn airlines(&self) -> &BTreeSet<String> {
        &self.airlines
    }

    pub fn departure_hours(&self) -> &HourRange {
        &self.departure_hours
    }

    pub fn arrival_hours(&self) -> &HourRange {
        &self.arrival_hours
    }

    pub fn duration(&self) -> &RangeFilter<i64> {
        &self.duration
    }

    pub fn with_price(mut self, price: RangeFilter<f64>) -> Self {
        self.price = price;
        self
    }

    pub fn with_stops(mut self, stops: BTreeSet<StopCategory>) -> Self {
        self.stops = stops;
        self
    }

    pub fn with_airlines(mut self, airlines: BTreeSet<String>) -> Self {
        self.airlines = airlines;
        self
    }

    pub fn with_departure_hours(mut self, range: HourRange) -> Self {
        self.departure_hours = range;
        self
    }

    pub fn with_arrival_hours(mut self, range: HourRange) -> Self {
        self.arrival_hours = range;
        self
    }

    pub fn with_duration(mut self, duration: RangeFilter<i64>) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the flight satisfies every active dimension.
    pub fn matches(&self, flight: &ProcessedFlight) -> bool {
        if !self.price.contains(flight.price) {
            return false;
        }
        if !self.stops.is_empty() && !self.stops.contains(&flight.stop_category()) {
            return false;
        }
        if !self.airlines.is_empty() && !self.airlines.contains(&flight.main_airline) {
            return false;
        }
        if !self.departure_hours.contains(flight.departure_hour()) {
            return false;
        }
        if !self.arrival_hours.contains(flight.arrival_hour()) {
            return false;
        }
        self.duration.contains(flight.total_duration_minutes)
    }

    /// True iff any dimension differs from its no-op default.
    pub fn has_active_filters(&self, defaults: &FilterDefaults) -> bool {
        if !self.stops.is_empty() || !self.airlines.is_empty() {
            return true;
        }
        if !self.departure_hours.is_full_day() || !self.arrival_hours.is_full_day() {
            return true;
        }
        if (self.price.min, self.price.max) != defaults.price_range {
            return true;
        }
        (self.duration.min, self.duration.max) != defaults.duration_range
    }
}

/// Filter options derived from the full normalized set, for the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Carrier codes, sorted and deduplicated.
    pub airlines: Vec<String>,
    pub price_range: (f64, f64),
    /// Bounds in minutes.
    pub duration_range: (i64, i64),
}

/// Apply the predicate, preserving input order.
pub fn apply_filters(flights: &[ProcessedFlight], filters: &FilterState) -> Vec<ProcessedFlight> {
    flights
        .iter()
        .filter(|flight| filters.matches(flight))
        .cloned()
        .collect()
}

/// Derive the selectable filter options from the full (unfiltered) set.
pub fn filter_options(flights: &[ProcessedFlight]) -> FilterOptions {
    let airlines: BTreeSet<&str> = flights.iter().map(|f| f.main_airline.as_str()).collect();
    let defaults = FilterDefaults::from_flights(flights);

    FilterOptions {
        airlines: airlines.into_iter().map(String::from).collect(),
        price_range: defaults.price_range,
        duration_range: defaults.duration_range,
    }
}
