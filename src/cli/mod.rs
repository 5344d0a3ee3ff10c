//! Command-line interface module.

mod args;
pub mod locate;
pub mod render;
pub mod repl;
pub mod search;

pub use args::{Cli, Commands};
