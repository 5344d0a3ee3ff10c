//! Selection state machine.
//!
//! Pure transition logic: every input returns the [`Effect`]s the actor must
//! carry out (timers, lookups, host callbacks). No I/O, no clocks.
//!
//! ```text
//!            input            select              details ok
//!   Empty ──────────► Suggesting ──────► Resolving ───────────► Committed
//!     ▲                 ▲   │               │ details err           │
//!     │                 │   └───────────────┘                       │
//!     │                 └──────────────── input ────────────────────┤
//!     └────────────────────── clear / empty input ──────────────────┘
//! ```
//!
//! Staleness is decided by key comparison at arrival: suggestions must match
//! the current query, details the selected identifier, and a location result
//! its ticket plus the interaction epoch it was started in.

use super::WidgetOptions;
use super::state::{Failure, Phase, SuggestionStatus, SuggestionView, WidgetState};
use crate::core::{Address, Candidate};
use crate::provider::{BootstrapError, LookupError};
use crate::resolve::{LocateError, Located};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Effect {
    /// Restart the quiet period with new text
    Debounce(String),
    CancelDebounce,
    /// Close the list once the blur grace period elapses
    CloseAfterGrace,
    CancelClose,
    FetchSuggestions(String),
    FetchDetails(String),
    Locate(u64),
    /// Invoke the host's location hook
    LocationDetected(Address),
}

pub(super) struct SelectionMachine {
    state: WidgetState,
    /// Debounced text driving suggestion lookup
    query: String,
    /// Bumped by every user action that supersedes in-flight work
    epoch: u64,
    /// Current location request
    ticket: u64,
    /// Epoch the current location request was started in
    located_in: u64,
}

impl SelectionMachine {
    pub(super) fn new(options: &WidgetOptions, bootstrap_error: Option<BootstrapError>) -> Self {
        let mut state = WidgetState {
            show_inline_error: options.show_inline_error,
            placeholder: options.placeholder.clone(),
            bootstrap_error,
            ..WidgetState::default()
        };

        if options.initial_address.is_committed() {
            state.phase = Phase::Committed;
            state.address = options.initial_address.clone();
            state.search_text = if options.initial_text.is_empty() {
                state.address.formatted_address.clone()
            } else {
                options.initial_text.clone()
            };
        } else if !options.initial_text.is_empty() {
            state.phase = Phase::Suggesting;
            state.search_text = options.initial_text.clone();
        }

        Self {
            state,
            query: String::new(),
            epoch: 0,
            ticket: 0,
            located_in: 0,
        }
    }

    pub(super) fn state(&self) -> &WidgetState {
        &self.state
    }

    pub(super) fn query(&self) -> &str {
        &self.query
    }

    // =========================================================================
    // User input
    // =========================================================================

    /// One keystroke: the field now holds `text`.
    pub(super) fn input(&mut self, text: String) -> Vec<Effect> {
        if text.is_empty() {
            return self.clear();
        }

        self.epoch += 1;
        if matches!(self.state.phase, Phase::Committed | Phase::Resolving) {
            // Typing discards the adopted address
            self.state.address = Address::EMPTY;
            self.state.selected_id.clear();
        }
        self.state.phase = Phase::Suggesting;
        self.state.search_text = text.clone();
        self.state.list_open = true;

        vec![Effect::CancelClose, Effect::Debounce(text)]
    }

    /// Quiet period elapsed for `query`.
    pub(super) fn debounce_fired(&mut self, query: String) -> Vec<Effect> {
        if self.state.phase != Phase::Suggesting {
            return Vec::new();
        }

        self.query = query;
        if self.query.trim().is_empty() || self.state.is_disabled() {
            self.state.suggestions = SuggestionView {
                query: self.query.clone(),
                ..SuggestionView::default()
            };
            return Vec::new();
        }

        self.state.suggestions = SuggestionView::loading(&self.query);
        vec![Effect::FetchSuggestions(self.query.clone())]
    }

    /// Choose the `index`-th suggestion of the open list.
    pub(super) fn select(&mut self, index: usize) -> Vec<Effect> {
        if !self.state.list_open || self.state.phase != Phase::Suggesting {
            crate::debug!("widget"; "no open list to select from");
            return Vec::new();
        }

        match self.state.suggestions.candidates.get(index).cloned() {
            Some(candidate) => self.select_candidate(candidate),
            None => {
                crate::debug!("widget"; "no suggestion at index {}", index);
                Vec::new()
            }
        }
    }

    pub(super) fn select_candidate(&mut self, candidate: Candidate) -> Vec<Effect> {
        if candidate.identifier.is_empty() || self.state.is_disabled() {
            return Vec::new();
        }

        self.epoch += 1;
        self.state.phase = Phase::Resolving;
        self.state.search_text = candidate.label;
        self.state.selected_id = candidate.identifier.clone();
        self.state.list_open = false;
        self.state.last_failure = None;

        vec![
            Effect::CancelDebounce,
            Effect::CancelClose,
            Effect::FetchDetails(candidate.identifier),
        ]
    }

    /// Explicit clear control, or the text deleted entirely.
    pub(super) fn clear(&mut self) -> Vec<Effect> {
        self.epoch += 1;
        self.query.clear();

        let state = &mut self.state;
        state.phase = Phase::Empty;
        state.search_text.clear();
        state.selected_id.clear();
        state.address = Address::EMPTY;
        state.list_open = false;
        state.touched = false;
        state.suggestions = SuggestionView::default();
        state.last_failure = None;

        vec![Effect::CancelDebounce, Effect::CancelClose]
    }

    pub(super) fn focus(&mut self) -> Vec<Effect> {
        match self.state.phase {
            // Back to editing; the address survives until the user types
            Phase::Committed => {
                self.state.search_text = self.state.address.formatted_address.clone();
                Vec::new()
            }
            Phase::Suggesting if !self.state.search_text.is_empty() => {
                self.state.list_open = true;
                vec![Effect::CancelClose]
            }
            _ => Vec::new(),
        }
    }

    pub(super) fn blur(&mut self) -> Vec<Effect> {
        if self.state.list_open {
            vec![Effect::CloseAfterGrace]
        } else {
            self.mark_touched();
            Vec::new()
        }
    }

    /// Blur grace period elapsed.
    pub(super) fn close_elapsed(&mut self) {
        self.state.list_open = false;
        self.mark_touched();
    }

    pub(super) fn detect_location(&mut self) -> Vec<Effect> {
        if self.state.locating {
            crate::debug!("locate"; "detection already running");
            return Vec::new();
        }
        if self.state.is_disabled() {
            return Vec::new();
        }

        self.ticket += 1;
        self.located_in = self.epoch;
        self.state.locating = true;
        vec![Effect::Locate(self.ticket)]
    }

    // =========================================================================
    // Resolutions
    // =========================================================================

    pub(super) fn suggestions_arrived(
        &mut self,
        query: &str,
        result: Result<Vec<Candidate>, LookupError>,
    ) {
        if query != self.query || self.state.phase == Phase::Empty {
            crate::debug!("suggest"; "dropping stale result for {:?}", query);
            return;
        }

        self.state.suggestions = match result {
            Ok(candidates) => {
                crate::debug!("suggest"; "{} candidates for {:?}", candidates.len(), query);
                SuggestionView {
                    query: query.to_string(),
                    candidates,
                    status: SuggestionStatus::Ready,
                }
            }
            Err(e) => {
                crate::log!("suggest"; "lookup for {:?} failed: {}", query, e);
                self.state.last_failure = Some(Failure::Suggestions(e));
                SuggestionView {
                    query: query.to_string(),
                    candidates: Vec::new(),
                    status: SuggestionStatus::Failed,
                }
            }
        };
    }

    pub(super) fn details_arrived(
        &mut self,
        identifier: &str,
        result: Result<Address, LookupError>,
    ) {
        if self.state.phase != Phase::Resolving || identifier != self.state.selected_id {
            crate::debug!("detail"; "dropping stale result for {:?}", identifier);
            return;
        }

        match result.and_then(committable) {
            Ok(address) => self.commit(address),
            Err(e) => {
                crate::log!("detail"; "lookup for {:?} failed: {}", identifier, e);
                self.state.phase = Phase::Suggesting;
                self.state.selected_id.clear();
                self.state.list_open = true;
                self.state.last_failure = Some(Failure::Details(e));
            }
        }
    }

    pub(super) fn location_arrived(
        &mut self,
        ticket: u64,
        result: Result<Located, LocateError>,
    ) -> Vec<Effect> {
        if ticket != self.ticket {
            return Vec::new();
        }
        self.state.locating = false;

        match result {
            Ok(_) if self.epoch != self.located_in => {
                crate::debug!("locate"; "user acted during detection, dropping result");
                Vec::new()
            }
            Ok(located) if !located.address.is_committed() => {
                let e = LocateError::Detail(uncommittable());
                crate::log!("locate"; "{}", e);
                self.state.last_failure = Some(Failure::Location(e));
                Vec::new()
            }
            Ok(located) => {
                self.state.selected_id = located.candidate.identifier;
                self.commit(located.address.clone());
                vec![
                    Effect::CancelDebounce,
                    Effect::CancelClose,
                    Effect::LocationDetected(located.address),
                ]
            }
            Err(e) => {
                crate::log!("locate"; "{}", e);
                self.state.last_failure = Some(Failure::Location(e));
                Vec::new()
            }
        }
    }

    fn commit(&mut self, address: Address) {
        self.query.clear();

        let state = &mut self.state;
        state.phase = Phase::Committed;
        state.search_text = address.formatted_address.clone();
        state.address = address;
        state.list_open = false;
        state.touched = false;
        state.suggestions = SuggestionView::default();
        state.last_failure = None;
    }

    fn mark_touched(&mut self) {
        if !self.state.search_text.is_empty() {
            self.state.touched = true;
        }
    }
}

/// Only an address with a formatted line may be adopted.
fn committable(address: Address) -> Result<Address, LookupError> {
    if address.is_committed() {
        Ok(address)
    } else {
        Err(uncommittable())
    }
}

fn uncommittable() -> LookupError {
    LookupError::Decode("resolved address has no formatted_address".to_string())
}
