//! Dotted config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Location of a setting inside `placeline.toml`, e.g. `widget.debounce_ms`.
///
/// Sections expose their paths as associated constants:
///
/// ```ignore
/// diag.error(WidgetConfig::FIELD_DEBOUNCE, "must be greater than zero");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
