//! Request cache with in-flight deduplication.
//!
//! Single entry point for every keyed provider lookup:
//! - Completed key → answered from `ready` without touching the provider
//! - Pending key   → caller joins the waiters of the running request
//! - Unknown key   → caller becomes the leader and performs the request
//!
//! Only successes are retained. A failure is broadcast to the waiters that
//! joined it and then forgotten, so re-triggering the same input retries.

use std::future::Future;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use tokio::sync::oneshot;

use crate::provider::LookupError;

type Waiter<V> = oneshot::Sender<Result<V, LookupError>>;

/// Key → pending-or-resolved result. Entries are never evicted.
pub struct RequestCache<V> {
    /// Log prefix (`suggest`, `detail`)
    name: &'static str,
    /// Keys with a request in flight → joined waiters
    pending: DashMap<String, Vec<Waiter<V>>, FxBuildHasher>,
    /// Completed keys → cached results
    ready: DashMap<String, V, FxBuildHasher>,
}

impl<V: Clone> RequestCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: DashMap::with_hasher(FxBuildHasher),
            ready: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Answer `key` from the cache, an in-flight request, or `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, LookupError>>,
    {
        // Fast path: cached
        if let Some(value) = self.get_cached(key) {
            crate::debug!(self.name; "cache hit: {:?}", key);
            return Ok(value);
        }

        let joined = match self.pending.entry(key.to_string()) {
            Entry::Occupied(mut e) => {
                let (tx, rx) = oneshot::channel();
                e.get_mut().push(tx);
                Some(rx)
            }
            Entry::Vacant(e) => {
                // Leader finished between the fast path and the entry lock
                if let Some(value) = self.get_cached(key) {
                    return Ok(value);
                }
                e.insert(Vec::new());
                None
            }
        };

        let Some(rx) = joined else {
            return self.lead(key, fetch).await;
        };

        crate::debug!(self.name; "joining in-flight request: {:?}", key);
        rx.await.unwrap_or(Err(LookupError::Aborted))
    }

    /// Get cached result.
    pub fn get_cached(&self, key: &str) -> Option<V> {
        self.ready.get(key).map(|v| v.clone())
    }

    /// Check if a request for `key` is running.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    async fn lead<F, Fut>(&self, key: &str, fetch: F) -> Result<V, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, LookupError>>,
    {
        let in_flight = InFlight {
            cache: self,
            key,
            done: false,
        };
        let result = fetch().await;
        in_flight.complete(&result);
        result
    }
}

/// Leader's claim on a pending key.
///
/// Dropping it without completing (leader cancelled) releases the key; the
/// joined waiters then observe [`LookupError::Aborted`].
struct InFlight<'a, V: Clone> {
    cache: &'a RequestCache<V>,
    key: &'a str,
    done: bool,
}

impl<V: Clone> InFlight<'_, V> {
    fn complete(mut self, result: &Result<V, LookupError>) {
        // Publish before releasing the key so late arrivals hit `ready`
        if let Ok(value) = result {
            self.cache.ready.insert(self.key.to_string(), value.clone());
        }

        let waiters = self
            .cache
            .pending
            .remove(self.key)
            .map(|(_, w)| w)
            .unwrap_or_default();

        for tx in waiters {
            let _ = tx.send(result.clone());
        }
        self.done = true;
    }
}

impl<V: Clone> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if !self.done {
            self.cache.pending.remove(self.key);
        }
    }
}
