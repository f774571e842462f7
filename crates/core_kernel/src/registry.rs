//! Domain Registry
//!
//! Configuration types for selecting a port implementation per domain.
//! Each domain can be served by the internal database adapter, an external
//! API adapter, or an in-memory mock, chosen at assembly time.
//!
//! ```rust,ignore
//! let config = DomainConfig::all_internal()
//!     .with_external_prisoner_directory(ExternalConfig::simple(
//!         "https://prisoner-directory.example.com",
//!         "api-key",
//!     ));
//! ```

use std::collections::HashMap;

/// Source configuration for an adapter
///
/// Specifies whether a domain should use an internal (database) or
/// external (API) adapter implementation.
#[derive(Debug, Clone, Default)]
pub enum AdapterSource {
    /// Use the internal database adapter
    #[default]
    Internal,

    /// Use an external API adapter with the given configuration
    External(ExternalConfig),

    /// Use a mock adapter (for testing)
    Mock,
}

/// Configuration for an external adapter
///
/// Contains all settings needed to connect to an external system.
#[derive(Debug, Clone, Default)]
pub struct ExternalConfig {
    /// Base URL of the external API
    pub base_url: String,

    /// API key for authentication
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Number of retry attempts
    pub retry_attempts: u32,

    /// Additional headers to include in requests
    pub headers: HashMap<String, String>,
}

impl ExternalConfig {
    /// Creates a new external config with just a base URL and API key
    pub fn simple(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Some(api_key.into()),
            timeout_secs: 30,
            retry_attempts: 3,
            ..Default::default()
        }
    }
}

/// Configuration for all domain adapters
///
/// Specifies which adapter implementation to use for each domain. Domains
/// not specified use the internal adapter. The prisoner directory is the
/// one source that is external in every deployed environment; it defaults
/// to internal only so that a fully-offline assembly is possible.
#[derive(Debug, Clone, Default)]
pub struct DomainConfig {
    /// Contact domain adapter source
    pub contact_source: AdapterSource,

    /// Relationship domain adapter source
    pub relationship_source: AdapterSource,

    /// Prisoner profile (versioned attributes) adapter source
    pub prisoner_profile_source: AdapterSource,

    /// Prisoner directory client source
    pub prisoner_directory_source: AdapterSource,

    /// Reference data source
    pub reference_source: AdapterSource,

    /// Event sink source
    pub event_sink_source: AdapterSource,
}

impl DomainConfig {
    /// Creates a configuration with all domains using internal adapters
    pub fn all_internal() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for testing (all mocks)
    pub fn for_testing() -> Self {
        Self {
            contact_source: AdapterSource::Mock,
            relationship_source: AdapterSource::Mock,
            prisoner_profile_source: AdapterSource::Mock,
            prisoner_directory_source: AdapterSource::Mock,
            reference_source: AdapterSource::Mock,
            event_sink_source: AdapterSource::Mock,
        }
    }

    /// Sets the prisoner directory to use an external adapter
    pub fn with_external_prisoner_directory(mut self, config: ExternalConfig) -> Self {
        self.prisoner_directory_source = AdapterSource::External(config);
        self
    }

    /// Sets the event sink to use an external adapter
    pub fn with_external_event_sink(mut self, config: ExternalConfig) -> Self {
        self.event_sink_source = AdapterSource::External(config);
        self
    }
}
