//! Resolvers - keyed provider lookups behind request caches.
//!
//! ```text
//! query ──► SuggestionResolver ──► [Candidate]
//! id    ──► DetailResolver     ──► Address
//! (gps) ──► LocationResolver   ──► Candidate ──► DetailResolver
//! ```
//!
//! Resolvers hold no interaction state; the caches are their only memory and
//! live as long as the widget that owns them.

pub mod cache;
pub mod detail;
pub mod locate;
pub mod suggest;

use std::sync::Arc;

pub use cache::RequestCache;
pub use detail::{DetailResolver, address_from_details};
pub use locate::{LocateError, Located, LocationResolver};
pub use suggest::SuggestionResolver;

use crate::location::LocationSource;
use crate::provider::AddressService;

/// All resolvers of one widget, sharing one provider handle.
pub struct Resolvers {
    pub suggestions: SuggestionResolver,
    pub details: Arc<DetailResolver>,
    pub location: LocationResolver,
}

impl Resolvers {
    pub fn new(service: Arc<dyn AddressService>, source: Arc<dyn LocationSource>) -> Self {
        let details = Arc::new(DetailResolver::new(service.clone()));
        Self {
            suggestions: SuggestionResolver::new(service.clone()),
            location: LocationResolver::new(source, service, details.clone()),
            details,
        }
    }
}
