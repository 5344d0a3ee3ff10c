//! `[widget]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [widget]
//! debounce_ms = 500             # quiet period before a suggestion lookup
//! blur_grace_ms = 200           # list stays open this long after blur
//! show_inline_error = true      # flag unconfirmed text after blur
//! placeholder = "Enter address"
//! show_location_icon = true
//! show_map_icon = true
//! location_icon_class = ""
//! map_icon_class = ""
//! ```
//!
//! Icon settings are presentational only.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::widget::{BLUR_GRACE_MS, DEBOUNCE_MS};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
    pub show_inline_error: bool,
    pub placeholder: String,
    pub show_location_icon: bool,
    pub show_map_icon: bool,
    pub location_icon_class: String,
    pub map_icon_class: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            blur_grace_ms: BLUR_GRACE_MS,
            show_inline_error: true,
            placeholder: "Enter address".to_string(),
            show_location_icon: true,
            show_map_icon: true,
            location_icon_class: String::new(),
            map_icon_class: String::new(),
        }
    }
}

impl WidgetConfig {
    pub const FIELD_DEBOUNCE: FieldPath = FieldPath::new("widget.debounce_ms");
    pub const FIELD_BLUR_GRACE: FieldPath = FieldPath::new("widget.blur_grace_ms");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.error_with_hint(
                Self::FIELD_DEBOUNCE,
                "debounce must be greater than zero",
                format!("without a quiet period every keystroke is a lookup; the default is {DEBOUNCE_MS}"),
            );
        }

        if self.blur_grace_ms > 5_000 {
            diag.warn(
                Self::FIELD_BLUR_GRACE,
                format!("{}ms keeps the list open long after blur", self.blur_grace_ms),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_widget_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.widget.debounce_ms, 500);
        assert_eq!(config.widget.blur_grace_ms, 200);
        assert!(config.widget.show_inline_error);
        assert!(config.widget.show_map_icon);
        assert_eq!(config.widget.placeholder, "Enter address");
    }

    #[test]
    fn test_widget_config_partial_override() {
        let config = test_parse_config("[widget]\nblur_grace_ms = 50\nshow_map_icon = false");

        assert_eq!(config.widget.blur_grace_ms, 50);
        assert!(!config.widget.show_map_icon);
        // untouched fields keep defaults
        assert_eq!(config.widget.debounce_ms, 500);
        assert!(config.widget.show_location_icon);
    }

    #[test]
    fn test_zero_debounce_rejected() {
        let config = test_parse_config("[widget]\ndebounce_ms = 0");
        let mut diag = ConfigDiagnostics::new();
        config.widget.validate(&mut diag);

        assert!(diag.has_errors());
        assert_eq!(diag.errors()[0].field, WidgetConfig::FIELD_DEBOUNCE);
    }

    #[test]
    fn test_long_grace_only_warns() {
        let config = test_parse_config("[widget]\nblur_grace_ms = 10000");
        let mut diag = ConfigDiagnostics::new();
        config.widget.validate(&mut diag);

        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);
    }
}
