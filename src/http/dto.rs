//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The core view types already derive Serialize/Deserialize and are re-used
//! directly; the structs here cover requests and the wrappers around them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// Re-export the core DTOs the API responds with.
pub use crate::api::{
    FilterOptions, PricePoint, PriceTrend, ProcessedFlight, SearchParams, SearchResultsView,
    SortDirection, SortField,
};

use crate::services::filter::{
    FilterDefaults, FilterError, FilterState, HourRange, RangeFilter, StopCategory,
};
use crate::services::session::DEFAULT_PAGE_SIZE;

/// Response for search creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSearchResponse {
    /// Id for addressing this search session
    pub search_id: String,
    /// Carrier code -> display name, for labelling airline filters
    pub carriers: HashMap<String, String>,
    /// First page of results
    pub results: SearchResultsView,
}

/// Filter update request.
///
/// Every field is optional; an omitted field falls back to its no-op default
/// (full range / empty selection). Invalid bounds are rejected, not corrected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterUpdateRequest {
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    /// Stop buckets: "0", "1", "2+"
    #[serde(default)]
    pub stops: Vec<String>,
    #[serde(default)]
    pub airlines: Vec<String>,
    #[serde(default)]
    pub departure_hour_min: Option<u32>,
    #[serde(default)]
    pub departure_hour_max: Option<u32>,
    #[serde(default)]
    pub arrival_hour_min: Option<u32>,
    #[serde(default)]
    pub arrival_hour_max: Option<u32>,
    /// Duration bounds in minutes
    #[serde(default)]
    pub duration_min: Option<i64>,
    #[serde(default)]
    pub duration_max: Option<i64>,
}

impl FilterUpdateRequest {
    /// Build a validated `FilterState`, filling omitted bounds from the
    /// session's observed defaults.
    pub fn into_filter_state(self, defaults: &FilterDefaults) -> Result<FilterState, FilterError> {
        let price = RangeFilter::new(
            self.price_min.unwrap_or(defaults.price_range.0),
            self.price_max.unwrap_or(defaults.price_range.1),
            "price",
        )?;

        let stops: BTreeSet<StopCategory> = self
            .stops
            .iter()
            .map(|label| label.parse())
            .collect::<Result<_, _>>()?;

        let airlines: BTreeSet<String> = self.airlines.into_iter().collect();

        let departure_hours = HourRange::new(
            self.departure_hour_min.unwrap_or(0),
            self.departure_hour_max.unwrap_or(23),
            "departure",
        )?;

        let arrival_hours = HourRange::new(
            self.arrival_hour_min.unwrap_or(0),
            self.arrival_hour_max.unwrap_or(23),
            "arrival",
        )?;

        let duration = RangeFilter::new(
            self.duration_min.unwrap_or(defaults.duration_range.0),
            self.duration_max.unwrap_or(defaults.duration_range.1),
            "duration",
        )?;

        Ok(FilterState::new(
            price,
            stops,
            airlines,
            departure_hours,
            arrival_hours,
            duration,
        ))
    }
}

/// Sort update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortUpdateRequest {
    pub field: SortField,
    #[serde(default = "default_direction")]
    pub direction: SortDirection,
}

fn default_direction() -> SortDirection {
    SortDirection::Asc
}

/// Page update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageUpdateRequest {
    /// 1-based page index
    pub page: usize,
}

/// Shareable-link response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    /// Query-string representation of the search parameters
    pub query: String,
}

/// Most recently created search, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastSearchResponse {
    pub params: Option<SearchParams>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Results per page the server is configured with
    pub page_size: usize,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: "v1".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FilterDefaults {
        FilterDefaults {
            price_range: (100.0, 400.0),
            duration_range: (180, 720),
        }
    }

    #[test]
    fn test_empty_request_builds_no_op_state() {
        let state = FilterUpdateRequest::default()
            .into_filter_state(&defaults())
            .unwrap();
        assert!(!state.has_active_filters(&defaults()));
    }

    #[test]
    fn test_bounds_fall_back_to_observed_defaults() {
        let request = FilterUpdateRequest {
            price_min: Some(150.0),
            ..Default::default()
        };
        let state = request.into_filter_state(&defaults()).unwrap();
        assert_eq!(state.price().min(), 150.0);
        assert_eq!(state.price().max(), 400.0);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let request = FilterUpdateRequest {
            price_min: Some(500.0),
            price_max: Some(100.0),
            ..Default::default()
        };
        assert!(request.into_filter_state(&defaults()).is_err());
    }

    #[test]
    fn test_unknown_stop_label_is_rejected() {
        let request = FilterUpdateRequest {
            stops: vec!["0".to_string(), "3".to_string()],
            ..Default::default()
        };
        assert!(request.into_filter_state(&defaults()).is_err());
    }

    #[test]
    fn test_stop_labels_parse() {
        let request = FilterUpdateRequest {
            stops: vec!["0".to_string(), "2+".to_string()],
            ..Default::default()
        };
        let state = request.into_filter_state(&defaults()).unwrap();
        assert_eq!(state.stops().len(), 2);
        assert!(state.stops().contains(&StopCategory::TwoPlus));
    }

    #[test]
    fn test_sort_request_wire_format() {
        let request: SortUpdateRequest =
            serde_json::from_str(r#"{"field": "price", "direction": "desc"}"#).unwrap();
        assert_eq!(request.field, SortField::Price);
        assert_eq!(request.direction, SortDirection::Desc);

        let defaulted: SortUpdateRequest =
            serde_json::from_str(r#"{"field": "departure"}"#).unwrap();
        assert_eq!(defaulted.direction, SortDirection::Asc);
    }
}
