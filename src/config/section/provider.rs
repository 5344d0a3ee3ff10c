//! `[provider]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [provider]
//! api_key = "AIza..."                               # or PLACELINE_API_KEY
//! base_url = "https://maps.googleapis.com/maps/api"
//! language = "en"                                   # result language
//! country = "us"                                    # restrict suggestions
//! timeout_secs = 10
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

pub const API_KEY_ENV: &str = "PLACELINE_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Upstream address service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: Option<String>,
    /// ISO 3166-1 alpha-2 code suggestions are restricted to
    pub country: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: None,
            country: None,
            timeout_secs: 10,
        }
    }
}

// Keys stay out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    pub const FIELD_BASE_URL: FieldPath = FieldPath::new("provider.base_url");
    pub const FIELD_COUNTRY: FieldPath = FieldPath::new("provider.country");
    pub const FIELD_TIMEOUT: FieldPath = FieldPath::new("provider.timeout_secs");

    /// Pick the API key: CLI flag, then config file, then environment.
    pub fn resolve_api_key(&mut self, cli: Option<&str>, env: Option<String>) {
        if let Some(key) = cli {
            self.api_key = Some(key.to_string());
            return;
        }
        if !self.has_api_key() {
            self.api_key = env.filter(|k| !k.trim().is_empty());
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if url::Url::parse(&self.base_url).is_err() {
            diag.error_with_hint(
                Self::FIELD_BASE_URL,
                format!("`{}` is not a valid URL", self.base_url),
                format!("the default is \"{DEFAULT_BASE_URL}\""),
            );
        }

        if self.timeout_secs == 0 {
            diag.error(Self::FIELD_TIMEOUT, "timeout must be at least 1 second");
        }

        if let Some(country) = &self.country
            && (country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()))
        {
            diag.error_with_hint(
                Self::FIELD_COUNTRY,
                format!("`{country}` is not a two-letter country code"),
                "use an ISO 3166-1 alpha-2 code such as \"us\" or \"de\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_provider_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.timeout_secs, 10);
        assert!(config.provider.api_key.is_none());
        assert!(!config.provider.has_api_key());
    }

    #[test]
    fn test_provider_config() {
        let config = test_parse_config(
            "[provider]\napi_key = \"k\"\nlanguage = \"de\"\ncountry = \"de\"\ntimeout_secs = 3",
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("k"));
        assert_eq!(config.provider.language.as_deref(), Some("de"));
        assert_eq!(config.provider.country.as_deref(), Some("de"));
        assert_eq!(config.provider.timeout_secs, 3);
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = ProviderConfig {
            api_key: Some("file".into()),
            ..ProviderConfig::default()
        };
        config.resolve_api_key(None, Some("env".into()));
        assert_eq!(config.api_key.as_deref(), Some("file"));

        config.resolve_api_key(Some("flag"), Some("env".into()));
        assert_eq!(config.api_key.as_deref(), Some("flag"));

        let mut config = ProviderConfig::default();
        config.resolve_api_key(None, Some("env".into()));
        assert_eq!(config.api_key.as_deref(), Some("env"));

        let mut config = ProviderConfig::default();
        config.resolve_api_key(None, Some("  ".into()));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("secret-key".into()),
            ..ProviderConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ProviderConfig {
            base_url: "not a url".into(),
            country: Some("usa".into()),
            timeout_secs: 0,
            ..ProviderConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}
