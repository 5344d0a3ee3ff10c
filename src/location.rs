//! Device location sources.
//!
//! A terminal has no platform geolocation service, so the position comes
//! from configuration. The trait keeps the resolver independent of that.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LocationConfig;
use crate::core::LatLng;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location services are not supported on this device")]
    Unsupported,

    #[error("location permission denied")]
    Denied,

    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// Platform "get current position" capability.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<LatLng, LocationError>;
}

/// Always reports the same position.
pub struct FixedLocation(pub LatLng);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Ok(self.0)
    }
}

/// Fails every request with a fixed error.
pub struct Unavailable(pub LocationError);

#[async_trait]
impl LocationSource for Unavailable {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Err(self.0.clone())
    }
}

/// Bounds another source with a deadline.
pub struct Timed<S> {
    inner: S,
    timeout: Duration,
}

impl<S: LocationSource> Timed<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<S: LocationSource> LocationSource for Timed<S> {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        tokio::time::timeout(self.timeout, self.inner.current_position())
            .await
            .map_err(|_| LocationError::Timeout)?
    }
}

/// Build the location source described by `[location]`.
pub fn from_config(config: &LocationConfig) -> Arc<dyn LocationSource> {
    let timeout = Duration::from_millis(config.timeout_ms);

    if config.denied {
        return Arc::new(Unavailable(LocationError::Denied));
    }

    match config.position() {
        Some(at) if at.is_valid() => Arc::new(Timed::new(FixedLocation(at), timeout)),
        _ => Arc::new(Unavailable(LocationError::Unsupported)),
    }
}
