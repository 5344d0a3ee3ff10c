//! Core types - pure value records shared across the codebase.

mod address;
mod candidate;

pub use address::Address;
pub use candidate::{Candidate, LatLng};
