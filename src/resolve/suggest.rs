//! Query → ordered candidate list.

use std::sync::Arc;

use super::cache::RequestCache;
use crate::core::Candidate;
use crate::provider::{AddressService, LookupError};

pub struct SuggestionResolver {
    service: Arc<dyn AddressService>,
    cache: RequestCache<Vec<Candidate>>,
}

impl SuggestionResolver {
    pub fn new(service: Arc<dyn AddressService>) -> Self {
        Self {
            service,
            cache: RequestCache::new("suggest"),
        }
    }

    /// Candidates for `query` in provider order.
    ///
    /// A blank query issues no request and yields an empty list. The cache key
    /// is the exact query string.
    pub async fn resolve(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let service = self.service.clone();
        let owned = query.to_string();
        self.cache
            .get_or_fetch(query, move || async move { service.predict(&owned).await })
            .await
    }

    pub fn cache(&self) -> &RequestCache<Vec<Candidate>> {
        &self.cache
    }
}
