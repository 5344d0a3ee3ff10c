//! Widget Message Definitions
//!
//! ```text
//! host --WidgetMsg--> WidgetActor --spawn--> resolver task
//!                          ^                      |
//!                          +-----Resolution-------+
//! ```

use crate::core::{Address, Candidate};
use crate::provider::LookupError;
use crate::resolve::{LocateError, Located};

/// Messages from the host to the widget actor
#[derive(Debug)]
pub enum WidgetMsg {
    /// Field text replaced (one keystroke)
    Input(String),
    Focus,
    Blur,
    /// Choose the n-th visible suggestion
    Select(usize),
    /// Choose a candidate directly
    SelectCandidate(Candidate),
    /// Explicit clear control
    Clear,
    DetectLocation,
    Unmount,
}

/// Results reported back by spawned resolver tasks, tagged with their key
#[derive(Debug)]
pub(super) enum Resolution {
    Suggestions {
        query: String,
        result: Result<Vec<Candidate>, LookupError>,
    },
    Details {
        identifier: String,
        result: Result<Address, LookupError>,
    },
    Location {
        ticket: u64,
        result: Result<Located, LocateError>,
    },
}
