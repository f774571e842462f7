//! Reference domain errors

use thiserror::Error;

use core_kernel::ErrorCategory;

use crate::groups::ReferenceGroup;

/// Errors that can occur when validating reference codes
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The code is not part of the named group
    #[error("Unsupported {group} code: {code}")]
    UnsupportedCode { group: ReferenceGroup, code: String },

    /// The reference data source could not be reached
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),
}

impl ReferenceError {
    /// Creates an UnsupportedCode error
    pub fn unsupported(group: ReferenceGroup, code: impl Into<String>) -> Self {
        ReferenceError::UnsupportedCode {
            group,
            code: code.into(),
        }
    }

    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReferenceError::UnsupportedCode { .. } => ErrorCategory::Validation,
            ReferenceError::Unavailable(_) => ErrorCategory::Internal,
        }
    }
}
