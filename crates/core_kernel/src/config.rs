//! Runtime configuration

use serde::Deserialize;

use crate::ports::Source;

/// Runtime configuration for the core
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Default source marker stamped on outbound events
    pub event_source: String,
    /// Site code used when the request layer supplies none
    pub default_site: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_source: "CASE_MANAGEMENT".to_string(),
            default_site: None,
            log_level: "info".to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from environment variables prefixed with `CONTACTS_`
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CONTACTS"))
            .build()?
            .try_deserialize()
    }

    /// Resolves the configured event source marker
    pub fn source(&self) -> Source {
        match self.event_source.as_str() {
            "MIGRATION" => Source::Migration,
            _ => Source::CaseManagement,
        }
    }
}
