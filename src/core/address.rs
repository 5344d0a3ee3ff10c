//! Resolved address record.

use serde::{Deserialize, Serialize};

/// A fully resolved, geocoded address.
///
/// Invariants:
/// - Replaced wholesale on every resolution, never patched field by field
/// - Either every location-derived field came from one resolution, or the
///   record equals [`Address::EMPTY`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    pub address_line2: String,
    pub formatted_address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Address {
    /// Canonical empty address (all strings empty, coordinates zero).
    pub const EMPTY: Self = Self {
        address_line1: String::new(),
        address_line2: String::new(),
        formatted_address: String::new(),
        city: String::new(),
        region: String::new(),
        postal_code: String::new(),
        country: String::new(),
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Check if this is the canonical empty address.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// A committed address always carries a formatted string.
    pub fn is_committed(&self) -> bool {
        !self.formatted_address.is_empty()
    }

    /// Google Maps search URL for this address.
    ///
    /// `place_id` pins the result to the exact place when known.
    pub fn map_url(&self, place_id: &str) -> Option<url::Url> {
        if !self.is_committed() {
            return None;
        }

        let mut url = url::Url::parse("https://www.google.com/maps/search/").ok()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api", "1");
            query.append_pair("query", &self.formatted_address);
            if !place_id.is_empty() {
                query.append_pair("query_place_id", place_id);
            }
        }
        Some(url)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::EMPTY
    }
}
