//! Prisoner domain errors

use thiserror::Error;

use core_kernel::{ErrorCategory, PortError, PrisonerNumber};
use domain_reference::ReferenceError;
use outbound_events::PublishError;

/// Errors that can occur in the prisoner domain
#[derive(Debug, Error)]
pub enum PrisonerError {
    /// The prisoner number does not exist in the directory
    #[error("Prisoner not found: {0}")]
    PrisonerNotFound(PrisonerNumber),

    /// No record exists for the requested attribute
    #[error("No {attribute} recorded for prisoner {prisoner_number}")]
    NoRecord {
        attribute: &'static str,
        prisoner_number: PrisonerNumber,
    },

    /// A value failed its constraint
    #[error("Field constraint violation: {0}")]
    Constraint(String),

    /// A coded value named an unsupported reference code
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The storage layer failed
    #[error(transparent)]
    Storage(#[from] PortError),

    /// The event sink failed after the write committed
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl PrisonerError {
    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrisonerError::PrisonerNotFound(_) | PrisonerError::NoRecord { .. } => {
                ErrorCategory::NotFound
            }
            PrisonerError::Constraint(_) => ErrorCategory::Validation,
            PrisonerError::Reference(err) => err.category(),
            PrisonerError::Storage(err) => match err {
                PortError::NotFound { .. } => ErrorCategory::NotFound,
                PortError::Conflict { .. } => ErrorCategory::Conflict,
                PortError::Validation { .. } => ErrorCategory::Validation,
                _ => ErrorCategory::Internal,
            },
            PrisonerError::Publish(err) => err.category(),
        }
    }
}
