//! Core error types used across the system

use thiserror::Error;

use crate::identifiers::PrisonerNumberError;
use crate::patch::PatchError;

/// The single outward-facing kind of a failure.
///
/// The request layer (an external collaborator) maps each category onto its
/// transport: `NotFound` → 404-equivalent, `Conflict` → 409-equivalent,
/// `Validation` → 400-equivalent, `Internal` → 500-equivalent. Every domain
/// error resolves to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// An identifier did not resolve to an entity
    NotFound,
    /// The operation conflicts with existing data
    Conflict,
    /// The request was malformed or named an unsupported code or value
    Validation,
    /// An infrastructure fault (storage, event sink)
    Internal,
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    PrisonerNumber(#[from] PrisonerNumberError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }

    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoreError::PrisonerNumber(_) | CoreError::Patch(_) | CoreError::Validation(_) => {
                ErrorCategory::Validation
            }
            CoreError::Configuration(_) => ErrorCategory::Internal,
        }
    }
}
