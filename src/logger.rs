//! Logging utilities with colored output and a single-line status display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only appears with `--verbose`
//! - `StatusLine` for overwriting widget status in the interactive front end
//!
//! # Example
//!
//! ```ignore
//! log!("widget"; "mounted with {}ms debounce", ms);
//! debug!("suggest"; "dropping stale result for {:?}", query);
//! status_info("locating...");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "widget" => prefix.bright_blue().bold().to_string(),
        "locate" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status Line (single-line status with overwrite)
// ============================================================================

/// Single-line status display for the interactive front end
///
/// Each message overwrites the previous one, so transient states such as
/// "searching..." or "locating..." never pile up in the terminal.
pub struct StatusLine {
    /// Lines of previous output to clear
    last_lines: usize,
}

static STATUS_LINE: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl StatusLine {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// Display info message (dimmed, no symbol).
    pub fn info(&mut self, message: &str) {
        self.display(String::new(), &format!("{}", message.dimmed()));
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display error message (✗ prefix, red).
    pub fn error(&mut self, message: &str) {
        self.display(format!("{}", "✗".red()), message);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let line = if symbol.is_empty() {
            message.to_string()
        } else {
            format!("{symbol} {message}")
        };
        writeln!(stdout, "{line}").ok();
        stdout.flush().ok();

        self.last_lines = line_count(message);
    }

    /// Forget the tracked block so the next message starts below it.
    pub fn detach(&mut self) {
        self.last_lines = 0;
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

/// Global status: info
pub fn status_info(message: &str) {
    STATUS_LINE.lock().info(message);
}

/// Global status: success
pub fn status_success(message: &str) {
    STATUS_LINE.lock().success(message);
}

/// Global status: error
pub fn status_error(message: &str) {
    STATUS_LINE.lock().error(message);
}

/// Keep the current status block on screen.
pub fn status_detach() {
    STATUS_LINE.lock().detach();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_new() {
        let status = StatusLine::new();
        assert_eq!(status.last_lines, 0);
    }

    #[test]
    fn test_line_count_single() {
        assert_eq!(line_count("searching \"1600 Amphi\""), 1);
    }

    #[test]
    fn test_line_count_multiline() {
        let message = "3 suggestions\n  1. a\n  2. b";
        assert_eq!(line_count(message), 3);
    }

    #[test]
    fn test_detach_resets_tracking() {
        let mut status = StatusLine::new();
        status.last_lines = 4;
        status.detach();
        assert_eq!(status.last_lines, 0);
    }
}
