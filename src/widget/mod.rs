//! Address widget - headless controller for one address field.
//!
//! Mounting spawns a [`actor::WidgetActor`] that owns all interaction state.
//! The host drives it through a [`WidgetHandle`] and observes
//! [`WidgetState`] snapshots; dropping every handle unmounts the widget and
//! tears down its timers.

mod actor;
mod debouncer;
mod machine;
mod messages;
mod state;


use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub use debouncer::{BLUR_GRACE_MS, DEBOUNCE_MS};
pub use messages::WidgetMsg;
pub use state::{
    Failure, INLINE_ERROR, NO_RESULTS, Phase, SuggestionStatus, SuggestionView, WidgetState,
};

use crate::config::{PlacelineConfig, WidgetConfig};
use crate::core::{Address, Candidate};
use crate::location::{self, LocationSource};
use crate::provider::{BootstrapError, ServiceHandle, ensure_places_client};
use crate::resolve::Resolvers;
use actor::WidgetActor;
use machine::SelectionMachine;

/// Host callback run with the address adopted from location detection.
pub type LocationHook = Arc<dyn Fn(&Address) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("widget has been unmounted")]
    Unmounted,
}

/// Behavior knobs for one widget.
#[derive(Clone)]
pub struct WidgetOptions {
    pub debounce: Duration,
    pub blur_grace: Duration,
    pub show_inline_error: bool,
    pub placeholder: String,
    /// Address the host already holds
    pub initial_address: Address,
    pub initial_text: String,
    pub on_location_detect: Option<LocationHook>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            blur_grace: Duration::from_millis(BLUR_GRACE_MS),
            show_inline_error: true,
            placeholder: String::new(),
            initial_address: Address::EMPTY,
            initial_text: String::new(),
            on_location_detect: None,
        }
    }
}

impl WidgetOptions {
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            blur_grace: Duration::from_millis(config.blur_grace_ms),
            show_inline_error: config.show_inline_error,
            placeholder: config.placeholder.clone(),
            ..Self::default()
        }
    }

    pub fn with_location_hook(mut self, hook: impl Fn(&Address) + Send + Sync + 'static) -> Self {
        self.on_location_detect = Some(Arc::new(hook));
        self
    }
}

pub struct Widget;

impl Widget {
    /// Mount a widget on the current tokio runtime.
    ///
    /// A failed provider still mounts: lookups are disabled and the error is
    /// held in every snapshot.
    pub fn mount(
        service: Result<ServiceHandle, BootstrapError>,
        location: Arc<dyn LocationSource>,
        options: WidgetOptions,
    ) -> WidgetHandle {
        let (resolvers, bootstrap_error) = match service {
            Ok(service) => (Some(Arc::new(Resolvers::new(service, location))), None),
            Err(e) => {
                crate::log!("widget"; "lookups disabled: {}", e);
                (None, Some(e))
            }
        };

        let machine = SelectionMachine::new(&options, bootstrap_error);
        let (state_tx, state_rx) = watch::channel(machine.state().clone());
        let (tx, rx) = mpsc::channel(64);

        crate::debug!(
            "widget";
            "mounted ({}ms debounce, {}ms blur grace)",
            options.debounce.as_millis(),
            options.blur_grace.as_millis()
        );

        let actor = WidgetActor::new(
            rx,
            state_tx,
            machine,
            options.debounce,
            options.blur_grace,
            resolvers,
            options.on_location_detect,
        );
        let task = tokio::spawn(actor.run());

        WidgetHandle { tx, state_rx, task }
    }

    /// Bootstrap the process-wide provider and mount with `placeline.toml` settings.
    pub async fn mount_with_config(config: &PlacelineConfig, options: WidgetOptions) -> WidgetHandle {
        let service = ensure_places_client(&config.provider).await;
        Self::mount(service, location::from_config(&config.location), options)
    }
}

/// Host-side handle to a mounted widget.
pub struct WidgetHandle {
    tx: mpsc::Sender<WidgetMsg>,
    state_rx: watch::Receiver<WidgetState>,
    task: JoinHandle<()>,
}

impl WidgetHandle {
    pub async fn send(&self, msg: WidgetMsg) -> Result<(), WidgetError> {
        self.tx.send(msg).await.map_err(|_| WidgetError::Unmounted)
    }

    /// Replace the field text (one keystroke).
    pub async fn input(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetMsg::Input(text.into())).await
    }

    pub async fn focus(&self) -> Result<(), WidgetError> {
        self.send(WidgetMsg::Focus).await
    }

    pub async fn blur(&self) -> Result<(), WidgetError> {
        self.send(WidgetMsg::Blur).await
    }

    /// Choose the `index`-th suggestion currently shown.
    pub async fn select(&self, index: usize) -> Result<(), WidgetError> {
        self.send(WidgetMsg::Select(index)).await
    }

    pub async fn select_candidate(&self, candidate: Candidate) -> Result<(), WidgetError> {
        self.send(WidgetMsg::SelectCandidate(candidate)).await
    }

    pub async fn clear(&self) -> Result<(), WidgetError> {
        self.send(WidgetMsg::Clear).await
    }

    pub async fn detect_location(&self) -> Result<(), WidgetError> {
        self.send(WidgetMsg::DetectLocation).await
    }

    /// Latest snapshot.
    pub fn state(&self) -> WidgetState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state_rx.clone()
    }

    /// Wait until a snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&WidgetState) -> bool,
    ) -> Result<WidgetState, WidgetError> {
        let mut rx = self.state_rx.clone();
        rx.wait_for(predicate)
            .await
            .map(|state| state.clone())
            .map_err(|_| WidgetError::Unmounted)
    }

    /// Stop the actor and wait for it to exit.
    pub async fn unmount(self) {
        let _ = self.tx.send(WidgetMsg::Unmount).await;
        if let Err(e) = self.task.await {
            crate::log!("error"; "widget actor failed: {}", e);
        }
    }
}
