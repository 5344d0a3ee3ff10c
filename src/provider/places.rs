//! Google Maps web-service client.
//!
//! Three endpoints back the [`AddressService`] capabilities:
//!
//! | Capability        | Endpoint                      |
//! |-------------------|-------------------------------|
//! | `predict`         | `place/autocomplete/json`     |
//! | `details`         | `place/details/json`          |
//! | `reverse_geocode` | `geocode/json?latlng=`        |
//!
//! Every response carries a `status` string. `OK` and `ZERO_RESULTS` are
//! successes (the latter empty); anything else is a provider error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{AddressService, LookupError, PlaceDetails};
use crate::config::ProviderConfig;
use crate::core::{Candidate, LatLng};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Fields requested from the details endpoint (billing is per field group).
const DETAIL_FIELDS: &str = "address_component,formatted_address,geometry";

/// HTTP client for the Places / Geocoding APIs.
pub struct PlacesClient {
    http: Client,
    api_key: String,
    base_url: String,
    language: Option<String>,
    country: Option<String>,
}

impl PlacesClient {
    /// Build a client from provider settings.
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            country: config.country.clone(),
        })
    }

    /// GET `{base_url}/{path}` with the key and language appended.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        if let Some(language) = self.language.as_deref() {
            query.push(("language", language));
        }
        query.push(("key", self.api_key.as_str()));

        let url = url::Url::parse_with_params(&format!("{}/{}", self.base_url, path), &query)
            .map_err(|e| LookupError::Transport(format!("invalid url for {path}: {e}")))?;

        crate::debug!("provider"; "GET {}", path);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::status(format!("HTTP {}", status.as_u16()), None));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AddressService for PlacesClient {
    async fn predict(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        let components = self.country.as_deref().map(|c| format!("country:{c}"));
        let mut params = vec![("input", query), ("types", "address")];
        if let Some(components) = components.as_deref() {
            params.push(("components", components));
        }

        let response: AutocompleteResponse = self.get("place/autocomplete/json", &params).await?;
        response.into_candidates()
    }

    async fn details(&self, identifier: &str) -> Result<PlaceDetails, LookupError> {
        let params = [("place_id", identifier), ("fields", DETAIL_FIELDS)];
        let response: DetailsResponse = self.get("place/details/json", &params).await?;
        response.into_details()
    }

    async fn reverse_geocode(&self, at: LatLng) -> Result<Vec<Candidate>, LookupError> {
        let latlng = at.to_string();
        let response: GeocodeResponse = self.get("geocode/json", &[("latlng", latlng.as_str())]).await?;
        response.into_candidates()
    }
}

// =============================================================================
// Wire types
// =============================================================================

/// Map a provider status to success or a lookup error.
fn check_status(status: &str, message: Option<String>) -> Result<(), LookupError> {
    match status {
        STATUS_OK | STATUS_ZERO_RESULTS => Ok(()),
        other => Err(LookupError::status(other, message)),
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
}

impl AutocompleteResponse {
    fn into_candidates(self) -> Result<Vec<Candidate>, LookupError> {
        check_status(&self.status, self.error_message)?;
        Ok(self
            .predictions
            .into_iter()
            .map(|p| Candidate::new(p.place_id, p.description))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
    #[serde(default)]
    error_message: Option<String>,
}

impl DetailsResponse {
    fn into_details(self) -> Result<PlaceDetails, LookupError> {
        if self.status != STATUS_OK {
            return Err(LookupError::status(self.status, self.error_message));
        }
        self.result
            .ok_or_else(|| LookupError::Decode("details response without result".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    place_id: String,
    #[serde(default)]
    formatted_address: String,
}

impl GeocodeResponse {
    fn into_candidates(self) -> Result<Vec<Candidate>, LookupError> {
        check_status(&self.status, self.error_message)?;
        Ok(self
            .results
            .into_iter()
            .map(|r| Candidate::new(r.place_id, r.formatted_address))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autocomplete_preserves_order() {
        let body = r#"{
            "status": "OK",
            "predictions": [
                {"place_id": "b", "description": "1600 Amphitheatre Parkway, Mountain View, CA, USA"},
                {"place_id": "a", "description": "1600 Amphitheatre Pkwy, Sunnyvale, CA, USA"}
            ]
        }"#;
        let response: AutocompleteResponse = serde_json::from_str(body).unwrap();
        let candidates = response.into_candidates().unwrap();
        let ids: Vec<_> = candidates.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(
            candidates[0].label,
            "1600 Amphitheatre Parkway, Mountain View, CA, USA"
        );
    }

    #[test]
    fn test_zero_results_is_empty_success() {
        let body = r#"{"status": "ZERO_RESULTS", "predictions": []}"#;
        let response: AutocompleteResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_candidates().unwrap().is_empty());
    }

    #[test]
    fn test_denied_is_error_not_empty() {
        let body = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "predictions": []
        }"#;
        let response: AutocompleteResponse = serde_json::from_str(body).unwrap();
        let err = response.into_candidates().unwrap_err();
        assert_eq!(
            err,
            LookupError::status("REQUEST_DENIED", Some("The provided API key is invalid.".into()))
        );
    }

    #[test]
    fn test_details_response() {
        let body = r#"{
            "status": "OK",
            "result": {
                "address_components": [
                    {"long_name": "1600", "short_name": "1600", "types": ["street_number"]},
                    {"long_name": "Mountain View", "short_name": "Mountain View", "types": ["locality", "political"]}
                ],
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                "geometry": {"location": {"lat": 37.4224, "lng": -122.0842}}
            }
        }"#;
        let response: DetailsResponse = serde_json::from_str(body).unwrap();
        let details = response.into_details().unwrap();
        assert_eq!(details.address_components.len(), 2);
        assert_eq!(details.geometry.location, LatLng::new(37.4224, -122.0842));
    }

    #[test]
    fn test_details_not_found() {
        let body = r#"{"status": "NOT_FOUND"}"#;
        let response: DetailsResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.into_details(),
            Err(LookupError::Status { status, .. }) if status == "NOT_FOUND"
        ));
    }

    #[test]
    fn test_details_zero_results_is_error() {
        // Details has no legitimate empty answer
        let body = r#"{"status": "ZERO_RESULTS"}"#;
        let response: DetailsResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_details().is_err());
    }

    #[test]
    fn test_geocode_first_is_best() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"place_id": "street", "formatted_address": "1600 Amphitheatre Pkwy"},
                {"place_id": "city", "formatted_address": "Mountain View, CA"}
            ]
        }"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let candidates = response.into_candidates().unwrap();
        assert_eq!(candidates[0].identifier, "street");
    }
}
