//! Scripted in-memory provider for tests.
//!
//! Responses are registered per key; every call is recorded so tests can
//! count network round-trips. Delays and gates control completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::Notify;

use super::{AddressComponent, AddressService, Geometry, LookupError, PlaceDetails};
use crate::core::{Candidate, LatLng};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Predict(String),
    Details(String),
    Reverse(LatLng),
}

const REVERSE_KEY: &str = "@reverse";

#[derive(Default)]
pub struct FakeService {
    predictions: Mutex<FxHashMap<String, Result<Vec<Candidate>, LookupError>>>,
    details: Mutex<FxHashMap<String, Result<PlaceDetails, LookupError>>>,
    reverse: Mutex<Option<Result<Vec<Candidate>, LookupError>>>,
    delays: Mutex<FxHashMap<String, Duration>>,
    gates: Mutex<FxHashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
    panic_on_reverse: AtomicBool,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predictions(self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.predictions.lock().insert(query.to_string(), Ok(candidates));
        self
    }

    pub fn with_prediction_error(self, query: &str, error: LookupError) -> Self {
        self.predictions.lock().insert(query.to_string(), Err(error));
        self
    }

    pub fn with_details(self, identifier: &str, details: PlaceDetails) -> Self {
        self.details.lock().insert(identifier.to_string(), Ok(details));
        self
    }

    pub fn with_detail_error(self, identifier: &str, error: LookupError) -> Self {
        self.details.lock().insert(identifier.to_string(), Err(error));
        self
    }

    pub fn with_reverse(self, candidates: Vec<Candidate>) -> Self {
        *self.reverse.lock() = Some(Ok(candidates));
        self
    }

    pub fn with_reverse_error(self, error: LookupError) -> Self {
        *self.reverse.lock() = Some(Err(error));
        self
    }

    /// Delay the answer for a query / identifier.
    pub fn with_delay(self, key: &str, millis: u64) -> Self {
        self.delays
            .lock()
            .insert(key.to_string(), Duration::from_millis(millis));
        self
    }

    /// Delay the reverse geocode answer.
    pub fn with_reverse_delay(self, millis: u64) -> Self {
        self.with_delay(REVERSE_KEY, millis)
    }

    pub fn panicking_reverse(self) -> Self {
        self.panic_on_reverse.store(true, Ordering::SeqCst);
        self
    }

    /// Hold answers for `key` until the returned gate is notified.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn predict_calls(&self, query: &str) -> usize {
        self.count(|c| matches!(c, Call::Predict(q) if q == query))
    }

    pub fn details_calls(&self, identifier: &str) -> usize {
        self.count(|c| matches!(c, Call::Details(id) if id == identifier))
    }

    pub fn reverse_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Reverse(_)))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    async fn hold(&self, key: &str) {
        let delay = self.delays.lock().get(key).copied();
        let gate = self.gates.lock().get(key).cloned();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl AddressService for FakeService {
    async fn predict(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        self.calls.lock().push(Call::Predict(query.to_string()));
        self.hold(query).await;
        let answer = self.predictions.lock().get(query).cloned();
        answer.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn details(&self, identifier: &str) -> Result<PlaceDetails, LookupError> {
        self.calls.lock().push(Call::Details(identifier.to_string()));
        self.hold(identifier).await;
        let answer = self.details.lock().get(identifier).cloned();
        answer.unwrap_or_else(|| Err(LookupError::status("NOT_FOUND", None)))
    }

    async fn reverse_geocode(&self, at: LatLng) -> Result<Vec<Candidate>, LookupError> {
        self.calls.lock().push(Call::Reverse(at));
        self.hold(REVERSE_KEY).await;
        if self.panic_on_reverse.load(Ordering::SeqCst) {
            panic!("reverse geocoder blew up");
        }
        let answer = self.reverse.lock().clone();
        answer.unwrap_or_else(|| Ok(Vec::new()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const AMPHITHEATRE_ID: &str = "ChIJ2eUgeAK6j4ARbn5u_wAGqWA";

pub fn amphitheatre() -> Candidate {
    Candidate::new(
        AMPHITHEATRE_ID,
        "1600 Amphitheatre Parkway, Mountain View, CA",
    )
}

fn component(long: &str, short: &str, kinds: &[&str]) -> AddressComponent {
    AddressComponent {
        long_name: long.to_string(),
        short_name: short.to_string(),
        types: kinds.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn amphitheatre_details() -> PlaceDetails {
    PlaceDetails {
        address_components: vec![
            component("1600", "1600", &["street_number"]),
            component("Amphitheatre Parkway", "Amphitheatre Pkwy", &["route"]),
            component("Mountain View", "Mountain View", &["locality", "political"]),
            component("Santa Clara County", "Santa Clara County", &["administrative_area_level_2", "political"]),
            component("California", "CA", &["administrative_area_level_1", "political"]),
            component("United States", "US", &["country", "political"]),
            component("94043", "94043", &["postal_code"]),
        ],
        formatted_address: "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA".to_string(),
        geometry: Geometry {
            location: LatLng::new(37.4224764, -122.0842499),
        },
    }
}

pub const BERLIN_ID: &str = "ChIJAVkDPzdOqEcRcDteW0YgIQQ";

pub fn berlin() -> Candidate {
    Candidate::new(BERLIN_ID, "Pariser Platz 1, Berlin, Germany")
}

pub fn berlin_details() -> PlaceDetails {
    PlaceDetails {
        address_components: vec![
            component("1", "1", &["street_number"]),
            component("Pariser Platz", "Pariser Platz", &["route"]),
            component("Berlin", "Berlin", &["locality", "political"]),
            component("Berlin", "BE", &["administrative_area_level_1", "political"]),
            component("Germany", "DE", &["country", "political"]),
            component("10117", "10117", &["postal_code"]),
        ],
        formatted_address: "Pariser Platz 1, 10117 Berlin, Germany".to_string(),
        geometry: Geometry {
            location: LatLng::new(52.5162746, 13.3777041),
        },
    }
}
