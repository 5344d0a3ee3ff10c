//! Process-wide provider bootstrap.
//!
//! The provider handle is created lazily on first use and shared read-only by
//! every widget. Concurrent callers all await the same initialization and
//! observe the same outcome, success or failure; there is no retry path
//! within one process.

use std::future::Future;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::OnceCell;

use super::{AddressService, PlacesClient};
use crate::config::ProviderConfig;

/// Global bootstrap for the HTTP provider.
pub static PROVIDER: LazyLock<Bootstrap> = LazyLock::new(Bootstrap::new);

pub type ServiceHandle = Arc<dyn AddressService>;

/// Provider could not be made ready. Disables all lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("no API key configured (set [provider] api_key or PLACELINE_API_KEY)")]
    MissingApiKey,

    #[error("failed to initialize provider client: {0}")]
    Client(String),
}

/// Memoized "ensure the provider is ready" cell.
pub struct Bootstrap {
    cell: OnceCell<Result<ServiceHandle, BootstrapError>>,
    /// Number of initializations actually started
    attempts: AtomicUsize,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Run `init` at most once and hand its outcome to every caller.
    pub async fn ensure_ready<F, Fut>(&self, init: F) -> Result<ServiceHandle, BootstrapError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ServiceHandle, BootstrapError>>,
    {
        self.cell
            .get_or_init(|| async move {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                let outcome = init().await;
                match &outcome {
                    Ok(_) => crate::debug!("provider"; "client ready"),
                    Err(e) => crate::log!("error"; "provider bootstrap failed: {}", e),
                }
                outcome
            })
            .await
            .clone()
    }

    /// Number of initializations actually started.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Outcome if bootstrap already ran.
    pub fn outcome(&self) -> Option<&Result<ServiceHandle, BootstrapError>> {
        self.cell.get()
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

/// Ensure the global Places client is ready.
pub async fn ensure_places_client(config: &ProviderConfig) -> Result<ServiceHandle, BootstrapError> {
    PROVIDER
        .ensure_ready(|| async {
            let api_key = config
                .api_key
                .clone()
                .filter(|_| config.has_api_key())
                .ok_or(BootstrapError::MissingApiKey)?;
            let client = PlacesClient::new(config, api_key)
                .map_err(|e| BootstrapError::Client(e.to_string()))?;
            Ok::<_, BootstrapError>(Arc::new(client) as ServiceHandle)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::FakeService;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_init() {
        let bootstrap = Arc::new(Bootstrap::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let bootstrap = bootstrap.clone();
            handles.push(tokio::spawn(async move {
                bootstrap
                    .ensure_ready(|| async {
                        tokio::task::yield_now().await;
                        Ok(Arc::new(FakeService::new()) as ServiceHandle)
                    })
                    .await
            }));
        }

        let mut services = Vec::new();
        for handle in handles {
            services.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(bootstrap.attempts(), 1);
        assert!(services.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_not_retried() {
        let bootstrap = Bootstrap::new();

        let first = bootstrap
            .ensure_ready(|| async { Err(BootstrapError::MissingApiKey) })
            .await;
        let second = bootstrap
            .ensure_ready(|| async { Ok(Arc::new(FakeService::new()) as ServiceHandle) })
            .await;

        assert_eq!(first.err(), Some(BootstrapError::MissingApiKey));
        assert_eq!(second.err(), Some(BootstrapError::MissingApiKey));
        assert_eq!(bootstrap.attempts(), 1);
    }

    #[tokio::test]
    async fn test_places_client_requires_api_key() {
        let outcome = ensure_places_client(&ProviderConfig::default()).await;
        assert!(matches!(outcome, Err(BootstrapError::MissingApiKey)));
        assert!(PROVIDER.outcome().is_some());
    }
}
