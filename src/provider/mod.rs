//! Upstream address-suggestion service.
//!
//! The widget only ever talks to [`AddressService`]; the concrete HTTP client
//! lives in `places`, and is acquired once per process through `bootstrap`.
//!
//! ```text
//! predict(query)        -> [Candidate]        (autocomplete)
//! details(identifier)   -> PlaceDetails       (place details)
//! reverse_geocode(at)   -> [Candidate]        (reverse geocoding)
//! ```

pub mod bootstrap;
#[cfg(test)]
pub mod fake;
pub mod places;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::{Candidate, LatLng};

pub use bootstrap::{Bootstrap, BootstrapError, PROVIDER, ServiceHandle, ensure_places_client};
pub use places::PlacesClient;

/// Failure of a single provider lookup.
///
/// `Clone` because one in-flight result is handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Provider answered with a non-OK status
    #[error("provider returned {status}{}", message_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Decode(String),

    /// The task running the lookup went away before answering
    #[error("lookup aborted")]
    Aborted,
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl LookupError {
    pub fn status(status: impl Into<String>, message: Option<String>) -> Self {
        Self::Status {
            status: status.into(),
            message,
        }
    }
}

/// One structured component of a place (street number, route, locality, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: LatLng,
}

/// Raw detail lookup response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub geometry: Geometry,
}

/// Capability handle for the upstream provider.
#[async_trait]
pub trait AddressService: Send + Sync {
    /// Ordered suggestions for free text, provider ranking preserved.
    async fn predict(&self, query: &str) -> Result<Vec<Candidate>, LookupError>;

    /// Structured details for a candidate identifier.
    async fn details(&self, identifier: &str) -> Result<PlaceDetails, LookupError>;

    /// Places at a coordinate, best match first.
    async fn reverse_geocode(&self, at: LatLng) -> Result<Vec<Candidate>, LookupError>;
}
