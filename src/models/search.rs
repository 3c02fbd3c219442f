//! Search parameters and cache keys.
//!
//! `SearchParams` is the record the user-interaction layer hands us; it doubles
//! as the shareable-link payload (query-string round-trip) and, minus
//! `max_results`, as the cache key identifying one fetched batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cabin class requested for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

/// One flight search request.
///
/// Used verbatim as the cache key (excluding `max_results`, which only bounds
/// fetch size) and as the only state serialized into shareable links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Origin airport IATA code.
    pub origin: String,
    /// Destination airport IATA code.
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_class: Option<TravelClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_stop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Upper bound on the number of offers fetched for this search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

/// Canonical identity of one fetched batch.
///
/// Two `SearchParams` that differ only in `max_results` map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SearchParams {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_date: NaiveDate,
        adults: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date,
            return_date: None,
            adults,
            children: None,
            infants: None,
            travel_class: None,
            non_stop: None,
            currency_code: None,
            max_results: None,
        }
    }

    /// Cache key for this search. Every field participates except `max_results`.
    pub fn cache_key(&self) -> SearchKey {
        let mut parts = vec![
            self.origin.to_ascii_uppercase(),
            self.destination.to_ascii_uppercase(),
            self.departure_date.to_string(),
            self.return_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "oneway".to_string()),
            format!("a{}", self.adults),
            format!("c{}", self.children.unwrap_or(0)),
            format!("i{}", self.infants.unwrap_or(0)),
        ];
        if let Some(class) = self.travel_class {
            parts.push(format!("{:?}", class).to_ascii_lowercase());
        }
        if self.non_stop == Some(true) {
            parts.push("nonstop".to_string());
        }
        if let Some(currency) = &self.currency_code {
            parts.push(currency.to_ascii_uppercase());
        }
        SearchKey(parts.join(":"))
    }

    /// Serialize to a URL query string for shareable links.
    ///
    /// Filter and sort state are session-local and intentionally absent.
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }

    /// Parse a shareable-link query string back into search parameters.
    pub fn from_query_string(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }
}
