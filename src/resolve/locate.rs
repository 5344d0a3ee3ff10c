//! Device position → candidate → address.

use std::sync::Arc;

use thiserror::Error;

use super::detail::DetailResolver;
use crate::core::{Address, Candidate, LatLng};
use crate::location::{LocationError, LocationSource};
use crate::provider::{AddressService, LookupError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("reverse geocoding failed: {0}")]
    Reverse(LookupError),

    #[error("no address found at {0}")]
    NoMatch(LatLng),

    #[error("address lookup failed: {0}")]
    Detail(LookupError),

    /// The detection task panicked or was cancelled
    #[error("location detection aborted")]
    Aborted,
}

/// Outcome of a successful detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub candidate: Candidate,
    pub address: Address,
}

pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    service: Arc<dyn AddressService>,
    details: Arc<DetailResolver>,
}

impl LocationResolver {
    pub fn new(
        source: Arc<dyn LocationSource>,
        service: Arc<dyn AddressService>,
        details: Arc<DetailResolver>,
    ) -> Self {
        Self {
            source,
            service,
            details,
        }
    }

    /// Acquire a position, reverse-geocode it, and resolve the best match
    /// through the shared detail cache.
    pub async fn locate(&self) -> Result<Located, LocateError> {
        let at = self.source.current_position().await?;
        crate::debug!("locate"; "position {}", at);

        let candidate = self
            .service
            .reverse_geocode(at)
            .await
            .map_err(LocateError::Reverse)?
            .into_iter()
            .next()
            .filter(|candidate| !candidate.identifier.is_empty())
            .ok_or(LocateError::NoMatch(at))?;
        crate::debug!("locate"; "best match {:?}", candidate.identifier);

        let address = self
            .details
            .resolve(&candidate.identifier)
            .await
            .map_err(LocateError::Detail)?;

        Ok(Located { candidate, address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{FixedLocation, Unavailable};
    use crate::provider::fake::{
        AMPHITHEATRE_ID, FakeService, amphitheatre, amphitheatre_details, berlin,
    };

    fn resolver(fake: Arc<FakeService>, source: Arc<dyn LocationSource>) -> LocationResolver {
        let details = Arc::new(DetailResolver::new(fake.clone()));
        LocationResolver::new(source, fake, details)
    }

    fn googleplex() -> Arc<dyn LocationSource> {
        Arc::new(FixedLocation(LatLng::new(37.4224, -122.0842)))
    }

    #[tokio::test]
    async fn test_locate_uses_first_match() {
        let fake = Arc::new(
            FakeService::new()
                .with_reverse(vec![amphitheatre(), berlin()])
                .with_details(AMPHITHEATRE_ID, amphitheatre_details()),
        );
        let located = resolver(fake.clone(), googleplex()).locate().await.unwrap();

        assert_eq!(located.candidate, amphitheatre());
        assert_eq!(located.address.city, "Mountain View");
        assert_eq!(fake.details_calls(AMPHITHEATRE_ID), 1);
    }

    #[tokio::test]
    async fn test_denied_fails_fast() {
        let fake = Arc::new(FakeService::new());
        let source = Arc::new(Unavailable(LocationError::Denied));
        let err = resolver(fake.clone(), source).locate().await.unwrap_err();

        assert_eq!(err, LocateError::Location(LocationError::Denied));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_reverse_match() {
        let fake = Arc::new(FakeService::new().with_reverse(vec![]));
        let err = resolver(fake, googleplex()).locate().await.unwrap_err();
        assert!(matches!(err, LocateError::NoMatch(_)));
    }

    #[tokio::test]
    async fn test_match_without_identifier_is_no_match() {
        let fake = Arc::new(FakeService::new().with_reverse(vec![Candidate::new("", "nowhere")]));
        let err = resolver(fake.clone(), googleplex()).locate().await.unwrap_err();

        assert!(matches!(err, LocateError::NoMatch(_)));
        assert_eq!(fake.details_calls(""), 0);
    }

    #[tokio::test]
    async fn test_reverse_failure() {
        let fake = Arc::new(
            FakeService::new().with_reverse_error(LookupError::status("OVER_QUERY_LIMIT", None)),
        );
        let err = resolver(fake, googleplex()).locate().await.unwrap_err();
        assert!(matches!(err, LocateError::Reverse(_)));
    }
}
