//! Wire model for raw flight offers as returned by the data provider.
//!
//! These structs mirror the provider's JSON payloads (camelCase fields) and are
//! treated as opaque by everything downstream of the normalizer: the only fields
//! the pipeline consumes are the ones declared here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One priced flight option, possibly spanning multiple itineraries
/// (e.g. outbound + return).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    /// Provider-assigned offer identifier, unique within one search response.
    pub id: String,
    pub itineraries: Vec<Itinerary>,
    pub price: OfferPrice,
}

/// One directional journey composed of one or more segments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Total itinerary duration as an ISO-8601 duration string, e.g. `"PT21H35M"`.
    pub duration: String,
    pub segments: Vec<Segment>,
}

/// One non-stop flight leg with a carrier, departure, and arrival.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    /// Operating carrier code, e.g. `"IB"`.
    pub carrier_code: String,
    /// Flight number within the carrier, e.g. `"6253"`.
    #[serde(default)]
    pub number: String,
}

/// Airport + timestamp pair for one end of a segment.
///
/// Provider timestamps are local to the airport and carry no offset, so they
/// deserialize as naive datetimes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    pub at: NaiveDateTime,
}

/// Total price for an offer.
///
/// The provider serializes the amount as a decimal string; parsing to a number
/// is the normalizer's job so that malformed amounts fail per-offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub total: String,
    pub currency: String,
}

/// One fetched search response: the raw offers plus the carrier display-name
/// dictionary that accompanies them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferBatch {
    pub offers: Vec<RawOffer>,
    /// Carrier code -> display name, e.g. `"IB" -> "Iberia"`.
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

impl OfferBatch {
    pub fn new(offers: Vec<RawOffer>, carriers: HashMap<String, String>) -> Self {
        Self { offers, carriers }
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }
}
