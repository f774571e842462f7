//! Relationship domain errors

use thiserror::Error;

use core_kernel::{
    ContactId, ErrorCategory, PatchError, PortError, PrisonerNumber, RelationshipId,
    RelationshipRestrictionId,
};
use domain_reference::ReferenceError;
use outbound_events::PublishError;

use crate::relationship::RelationshipTuple;

/// Errors that can occur in the relationship domain
#[derive(Debug, Error)]
pub enum RelationshipError {
    /// Relationship with the given ID was not found
    #[error("Prisoner contact relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    /// The contact side of the relationship did not resolve
    #[error("Contact not found: {0}")]
    ContactNotFound(ContactId),

    /// The prisoner number does not exist in the directory
    #[error("Prisoner not found: {0}")]
    PrisonerNotFound(PrisonerNumber),

    /// Restriction with the given ID was not found
    #[error("Prisoner contact restriction not found: {0}")]
    RestrictionNotFound(RelationshipRestrictionId),

    /// A current-term relationship with the same tuple already exists
    #[error("Duplicate relationship {0}")]
    DuplicateRelationship(RelationshipTuple),

    /// Relationship-scoped restrictions exist, so the relationship cannot
    /// be hard-deleted
    #[error("Relationship {0} has restrictions and cannot be deleted")]
    RestrictionsPreventDeletion(RelationshipId),

    /// A tri-state field received explicit null where unsupported
    #[error("Unsupported value for {field}: null is not supported")]
    UnsupportedValue { field: &'static str },

    /// A field failed its length or format constraint
    #[error("Field constraint violation: {0}")]
    Constraint(String),

    /// A coded field named an unsupported reference code
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The storage layer failed
    #[error(transparent)]
    Storage(PortError),

    /// The event sink failed after the write committed
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl From<PatchError> for RelationshipError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::NullNotAllowed { field } => RelationshipError::UnsupportedValue { field },
        }
    }
}

impl From<PortError> for RelationshipError {
    fn from(err: PortError) -> Self {
        RelationshipError::Storage(err)
    }
}

impl From<validator::ValidationErrors> for RelationshipError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RelationshipError::Constraint(errors.to_string())
    }
}

impl RelationshipError {
    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelationshipError::RelationshipNotFound(_)
            | RelationshipError::ContactNotFound(_)
            | RelationshipError::PrisonerNotFound(_)
            | RelationshipError::RestrictionNotFound(_) => ErrorCategory::NotFound,
            RelationshipError::DuplicateRelationship(_)
            | RelationshipError::RestrictionsPreventDeletion(_) => ErrorCategory::Conflict,
            RelationshipError::UnsupportedValue { .. } | RelationshipError::Constraint(_) => {
                ErrorCategory::Validation
            }
            RelationshipError::Reference(err) => err.category(),
            RelationshipError::Storage(err) => match err {
                PortError::NotFound { .. } => ErrorCategory::NotFound,
                PortError::Conflict { .. } => ErrorCategory::Conflict,
                PortError::Validation { .. } => ErrorCategory::Validation,
                _ => ErrorCategory::Internal,
            },
            RelationshipError::Publish(err) => err.category(),
        }
    }
}
