//! Identifier → structured [`Address`].

use std::sync::Arc;

use super::cache::RequestCache;
use crate::core::Address;
use crate::provider::{AddressComponent, AddressService, LookupError, PlaceDetails};

pub struct DetailResolver {
    service: Arc<dyn AddressService>,
    cache: RequestCache<Address>,
}

impl DetailResolver {
    pub fn new(service: Arc<dyn AddressService>) -> Self {
        Self {
            service,
            cache: RequestCache::new("detail"),
        }
    }

    /// Resolve a candidate identifier to a full address.
    ///
    /// An empty identifier issues no request and yields the empty address.
    pub async fn resolve(&self, identifier: &str) -> Result<Address, LookupError> {
        if identifier.is_empty() {
            return Ok(Address::EMPTY);
        }

        let service = self.service.clone();
        let owned = identifier.to_string();
        self.cache
            .get_or_fetch(identifier, move || async move {
                let details = service.details(&owned).await?;
                address_from_details(&details)
            })
            .await
    }

    pub fn cache(&self) -> &RequestCache<Address> {
        &self.cache
    }
}

/// Extract an [`Address`] from provider components.
///
/// | Field            | Source                                    |
/// |------------------|-------------------------------------------|
/// | `address_line1`  | `street_number` + `route` (long names)    |
/// | `city`           | `locality`                                |
/// | `region`         | `administrative_area_level_1` (short)     |
/// | `postal_code`    | `postal_code`                             |
/// | `country`        | `country` (long)                          |
///
/// Missing components become empty strings. A response without a formatted
/// address cannot be committed and is rejected.
pub fn address_from_details(details: &PlaceDetails) -> Result<Address, LookupError> {
    if details.formatted_address.trim().is_empty() {
        return Err(LookupError::Decode(
            "details response without formatted_address".to_string(),
        ));
    }

    let components = &details.address_components;
    let long = |kind: &str| find(components, kind).map(|c| c.long_name.clone());
    let short = |kind: &str| find(components, kind).map(|c| c.short_name.clone());

    let street = [long("street_number"), long("route")]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Address {
        address_line1: street,
        address_line2: String::new(),
        formatted_address: details.formatted_address.clone(),
        city: long("locality").unwrap_or_default(),
        region: short("administrative_area_level_1").unwrap_or_default(),
        postal_code: long("postal_code").unwrap_or_default(),
        country: long("country").unwrap_or_default(),
        latitude: details.geometry.location.lat,
        longitude: details.geometry.location.lng,
    })
}

fn find<'a>(components: &'a [AddressComponent], kind: &str) -> Option<&'a AddressComponent> {
    components.iter().find(|c| c.has_type(kind))
}
