//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for implementing the
//! hexagonal architecture (ports and adapters) pattern across all domain
//! modules.
//!
//! Each domain defines its own port trait that extends the marker trait
//! here. Adapters implement these traits to provide either a database-backed
//! implementation or an in-memory one for tests; the application services
//! depend only on the trait.
//!
//! ```rust,ignore
//! // In domain_contact/src/ports.rs
//! #[async_trait]
//! pub trait ContactPort: DomainPort {
//!     async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError>;
//!     async fn save_contact(&self, contact: &Contact) -> Result<(), PortError>;
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// ensuring consistent error handling across adapters. Uniqueness-constraint
/// violations in the storage layer surface as [`PortError::Conflict`] so a
/// concurrent duplicate write is indistinguishable from one caught by the
/// pre-write check.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error indicates a data conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Origin of a mutation, carried on every outbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    /// An interactive case-management user drove the change
    CaseManagement,
    /// The change arrived through the migration/sync channel
    Migration,
}

/// Per-request context supplied by the (external) request layer.
///
/// The routing and role-check layer authenticates the caller and resolves
/// the active site before the core is invoked; the core trusts these values
/// and stamps them onto audit columns and outbound events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Username of the acting user
    pub username: String,
    /// Site (caseload) the user is currently operating under
    pub active_site: Option<String>,
    /// Origin of the mutation
    pub source: Source,
}

impl RequestContext {
    /// Creates a context for an interactive case-management user
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            active_site: None,
            source: Source::CaseManagement,
        }
    }

    /// Sets the active site code
    pub fn with_active_site(mut self, site: impl Into<String>) -> Self {
        self.active_site = Some(site.into());
        self
    }

    /// Marks the context as originating from the migration channel
    pub fn from_migration(mut self) -> Self {
        self.source = Source::Migration;
        self
    }
}
