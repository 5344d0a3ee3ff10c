//! Widget Actor
//!
//! Owns the selection machine and its timers; runs every lookup in a
//! spawned task that reports back over the resolution channel.
//!
//! ```text
//! WidgetMsg ──┐
//! Resolution ─┼──► select! ──► SelectionMachine ──► Effects ──► watch<WidgetState>
//! timers ─────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant};

use super::debouncer::Debouncer;
use super::machine::{Effect, SelectionMachine};
use super::messages::{Resolution, WidgetMsg};
use super::state::WidgetState;
use super::LocationHook;
use crate::provider::LookupError;
use crate::resolve::{LocateError, Resolvers};

pub(super) struct WidgetActor {
    rx: mpsc::Receiver<WidgetMsg>,
    results_tx: mpsc::UnboundedSender<Resolution>,
    results_rx: mpsc::UnboundedReceiver<Resolution>,
    state_tx: watch::Sender<WidgetState>,
    machine: SelectionMachine,
    debouncer: Debouncer<String>,
    /// Pending blur-grace close
    close_at: Option<Instant>,
    blur_grace: Duration,
    /// `None` when the provider failed to bootstrap
    resolvers: Option<Arc<Resolvers>>,
    on_location_detect: Option<LocationHook>,
}

impl WidgetActor {
    pub(super) fn new(
        rx: mpsc::Receiver<WidgetMsg>,
        state_tx: watch::Sender<WidgetState>,
        machine: SelectionMachine,
        debounce: Duration,
        blur_grace: Duration,
        resolvers: Option<Arc<Resolvers>>,
        on_location_detect: Option<LocationHook>,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            rx,
            results_tx,
            results_rx,
            state_tx,
            machine,
            debouncer: Debouncer::new(debounce),
            close_at: None,
            blur_grace,
            resolvers,
            on_location_detect,
        }
    }

    /// Run the actor event loop until unmounted or every handle is dropped.
    pub(super) async fn run(mut self) {
        loop {
            let debounce_at = self.debouncer.deadline();
            let close_at = self.close_at;

            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(WidgetMsg::Unmount) | None => break,
                    Some(msg) => self.handle_msg(msg),
                },
                Some(resolution) = self.results_rx.recv() => self.apply(resolution),
                _ = sleep_until(debounce_at) => {
                    if let Some(query) = self.debouncer.take_if_ready() {
                        crate::debug!("widget"; "debounced {:?}", query);
                        let effects = self.machine.debounce_fired(query);
                        self.run_effects(effects);
                    }
                }
                _ = sleep_until(close_at) => {
                    self.close_at = None;
                    self.machine.close_elapsed();
                }
            }

            self.publish();
        }

        crate::debug!("widget"; "unmounted");
    }

    fn handle_msg(&mut self, msg: WidgetMsg) {
        let effects = match msg {
            WidgetMsg::Input(text) => self.machine.input(text),
            WidgetMsg::Focus => self.machine.focus(),
            WidgetMsg::Blur => self.machine.blur(),
            WidgetMsg::Select(index) => self.machine.select(index),
            WidgetMsg::SelectCandidate(candidate) => self.machine.select_candidate(candidate),
            WidgetMsg::Clear => self.machine.clear(),
            WidgetMsg::DetectLocation => self.machine.detect_location(),
            WidgetMsg::Unmount => Vec::new(),
        };
        self.run_effects(effects);
    }

    fn apply(&mut self, resolution: Resolution) {
        let effects = match resolution {
            Resolution::Suggestions { query, result } => {
                self.machine.suggestions_arrived(&query, result);
                Vec::new()
            }
            Resolution::Details { identifier, result } => {
                self.machine.details_arrived(&identifier, result);
                Vec::new()
            }
            Resolution::Location { ticket, result } => self.machine.location_arrived(ticket, result),
        };
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Debounce(text) => self.debouncer.push(text),
                Effect::CancelDebounce => self.debouncer.cancel(),
                Effect::CloseAfterGrace => self.close_at = Some(Instant::now() + self.blur_grace),
                Effect::CancelClose => self.close_at = None,
                Effect::FetchSuggestions(query) => self.fetch_suggestions(query),
                Effect::FetchDetails(identifier) => self.fetch_details(identifier),
                Effect::Locate(ticket) => self.locate(ticket),
                Effect::LocationDetected(address) => {
                    crate::log!("locate"; "detected {}", address.formatted_address);
                    if let Some(hook) = &self.on_location_detect {
                        hook(&address);
                    }
                }
            }
        }
    }

    fn fetch_suggestions(&self, query: String) {
        let Some(resolvers) = self.resolvers.clone() else {
            return;
        };
        let aborted = Resolution::Suggestions {
            query: query.clone(),
            result: Err(LookupError::Aborted),
        };
        spawn_resolution(&self.results_tx, aborted, async move {
            let result = resolvers.suggestions.resolve(&query).await;
            Resolution::Suggestions { query, result }
        });
    }

    fn fetch_details(&self, identifier: String) {
        let Some(resolvers) = self.resolvers.clone() else {
            return;
        };
        let aborted = Resolution::Details {
            identifier: identifier.clone(),
            result: Err(LookupError::Aborted),
        };
        spawn_resolution(&self.results_tx, aborted, async move {
            let result = resolvers.details.resolve(&identifier).await;
            Resolution::Details { identifier, result }
        });
    }

    fn locate(&self, ticket: u64) {
        let aborted = Resolution::Location {
            ticket,
            result: Err(LocateError::Aborted),
        };
        let Some(resolvers) = self.resolvers.clone() else {
            // Machine never asks while disabled; still release `locating`
            let _ = self.results_tx.send(aborted);
            return;
        };
        spawn_resolution(&self.results_tx, aborted, async move {
            let result = resolvers.location.locate().await;
            Resolution::Location { ticket, result }
        });
    }

    fn publish(&self) {
        let next = self.machine.state();
        self.state_tx.send_if_modified(|current| {
            if current == next {
                return false;
            }
            *current = next.clone();
            true
        });
    }
}

/// Run `task` and report its resolution; a panic or cancellation reports
/// `aborted` instead, so the machine never waits on a dead task.
fn spawn_resolution<F>(tx: &mpsc::UnboundedSender<Resolution>, aborted: Resolution, task: F)
where
    F: Future<Output = Resolution> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let resolution = match tokio::spawn(task).await {
            Ok(resolution) => resolution,
            Err(e) => {
                crate::log!("error"; "resolver task failed: {}", e);
                aborted
            }
        };
        // Receiver gone means the widget was unmounted
        let _ = tx.send(resolution);
    });
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
