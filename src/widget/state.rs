//! Observable widget state.
//!
//! Everything the host sees is a [`WidgetState`] snapshot. Snapshots are
//! plain values; the actor publishes a fresh one after every transition.

use thiserror::Error;

use crate::core::{Address, Candidate};
use crate::provider::{BootstrapError, LookupError};
use crate::resolve::LocateError;

/// Message shown beneath the field when text was entered but never confirmed.
pub const INLINE_ERROR: &str = "Please select an address from the suggestions";

/// Shown in place of the list when the provider had no match.
pub const NO_RESULTS: &str = "No address found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No text, no address
    #[default]
    Empty,
    /// Free typing, suggestion list driven by the debounced query
    Suggesting,
    /// Candidate chosen, details pending
    Resolving,
    /// Address adopted
    Committed,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Suggesting => "suggesting",
            Self::Resolving => "resolving",
            Self::Committed => "committed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Lookup failed; distinct from a legitimate empty answer
    Failed,
}

/// Suggestion list as last resolved for `query`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggestionView {
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub status: SuggestionStatus,
}

impl SuggestionView {
    pub fn loading(query: &str) -> Self {
        Self {
            query: query.to_string(),
            candidates: Vec::new(),
            status: SuggestionStatus::Loading,
        }
    }

    /// Provider answered and had nothing.
    pub fn is_no_results(&self) -> bool {
        self.status == SuggestionStatus::Ready && self.candidates.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SuggestionStatus::Loading
    }
}

/// Most recent resolution failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    #[error("suggestion lookup failed: {0}")]
    Suggestions(LookupError),

    #[error("address lookup failed: {0}")]
    Details(LookupError),

    #[error(transparent)]
    Location(LocateError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetState {
    pub phase: Phase,
    pub search_text: String,
    /// Identifier of the chosen candidate; empty when nothing is selected
    pub selected_id: String,
    pub address: Address,
    pub list_open: bool,
    pub locating: bool,
    pub suggestions: SuggestionView,
    /// Field lost focus with text still unconfirmed
    pub touched: bool,
    pub show_inline_error: bool,
    pub placeholder: String,
    pub last_failure: Option<Failure>,
    /// Provider never became ready; all lookups are disabled
    pub bootstrap_error: Option<BootstrapError>,
}

impl WidgetState {
    /// Inline validation message, if one should be shown.
    ///
    /// Only once the list has closed: an open list (even one saying
    /// "No address found") is feedback enough.
    pub fn inline_error(&self) -> Option<&'static str> {
        let unconfirmed = matches!(self.phase, Phase::Empty | Phase::Suggesting);
        (self.show_inline_error
            && self.touched
            && unconfirmed
            && !self.list_open
            && !self.search_text.trim().is_empty())
        .then_some(INLINE_ERROR)
    }

    pub fn is_disabled(&self) -> bool {
        self.bootstrap_error.is_some()
    }

    pub fn is_committed(&self) -> bool {
        self.phase == Phase::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touched(text: &str) -> WidgetState {
        WidgetState {
            phase: Phase::Suggesting,
            search_text: text.to_string(),
            touched: true,
            show_inline_error: true,
            ..WidgetState::default()
        }
    }

    #[test]
    fn test_inline_error_after_blur() {
        assert_eq!(touched("xyz").inline_error(), Some(INLINE_ERROR));
    }

    #[test]
    fn test_inline_error_hidden_while_list_open() {
        let state = WidgetState {
            list_open: true,
            ..touched("xyz")
        };
        assert_eq!(state.inline_error(), None);
    }

    #[test]
    fn test_inline_error_disabled_by_option() {
        let state = WidgetState {
            show_inline_error: false,
            ..touched("xyz")
        };
        assert_eq!(state.inline_error(), None);
    }

    #[test]
    fn test_inline_error_never_when_committed_or_blank() {
        let committed = WidgetState {
            phase: Phase::Committed,
            ..touched("xyz")
        };
        assert_eq!(committed.inline_error(), None);
        assert_eq!(touched("  ").inline_error(), None);
    }

    #[test]
    fn test_no_results_distinct_from_failure() {
        let empty = SuggestionView {
            status: SuggestionStatus::Ready,
            ..SuggestionView::default()
        };
        let failed = SuggestionView {
            status: SuggestionStatus::Failed,
            ..SuggestionView::default()
        };
        assert!(empty.is_no_results());
        assert!(!failed.is_no_results());
    }
}
