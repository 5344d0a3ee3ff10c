//! `[location]` section configuration.
//!
//! A terminal has no positioning hardware to ask, so the device position
//! is configured here.
//!
//! # Example
//!
//! ```toml
//! [location]
//! latitude = 37.4224
//! longitude = -122.0842
//! denied = false        # behave as if the permission prompt was refused
//! timeout_ms = 10000
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::LatLng;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub denied: bool,
    pub timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            denied: false,
            timeout_ms: 10_000,
        }
    }
}

impl LocationConfig {
    pub const FIELD_LATITUDE: FieldPath = FieldPath::new("location.latitude");
    pub const FIELD_LONGITUDE: FieldPath = FieldPath::new("location.longitude");

    /// Configured position, if both coordinates are set.
    pub fn position(&self) -> Option<LatLng> {
        Some(LatLng::new(self.latitude?, self.longitude?))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match (self.latitude, self.longitude) {
            (Some(_), None) => diag.error(Self::FIELD_LONGITUDE, "latitude is set without longitude"),
            (None, Some(_)) => diag.error(Self::FIELD_LATITUDE, "longitude is set without latitude"),
            _ => {}
        }

        if let Some(lat) = self.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            diag.error(Self::FIELD_LATITUDE, format!("{lat} is outside -90..=90"));
        }
        if let Some(lng) = self.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            diag.error(Self::FIELD_LONGITUDE, format!("{lng} is outside -180..=180"));
        }
    }
}
