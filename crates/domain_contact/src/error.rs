//! Contact domain errors

use thiserror::Error;

use core_kernel::{
    ContactAddressId, ContactEmailId, ContactEmploymentId, ContactId, ContactIdentityId,
    ContactPhoneId, ContactRestrictionId, ErrorCategory, PatchError, PortError,
};
use domain_reference::ReferenceError;
use outbound_events::PublishError;

/// Errors that can occur in the contact domain
#[derive(Debug, Error)]
pub enum ContactError {
    /// Contact with the given ID was not found
    #[error("Contact not found: {0}")]
    ContactNotFound(ContactId),

    /// Address with the given ID was not found (or is deleted)
    #[error("Contact address not found: {0}")]
    AddressNotFound(ContactAddressId),

    /// Phone with the given ID was not found
    #[error("Contact phone not found: {0}")]
    PhoneNotFound(ContactPhoneId),

    /// Email with the given ID was not found
    #[error("Contact email not found: {0}")]
    EmailNotFound(ContactEmailId),

    /// Identity document with the given ID was not found
    #[error("Contact identity not found: {0}")]
    IdentityNotFound(ContactIdentityId),

    /// Employment with the given ID was not found
    #[error("Contact employment not found: {0}")]
    EmploymentNotFound(ContactEmploymentId),

    /// Restriction with the given ID was not found
    #[error("Contact restriction not found: {0}")]
    RestrictionNotFound(ContactRestrictionId),

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

impl From<PatchError> for ContactError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::NullNotAllowed { field } => ContactError::UnsupportedValue { field },
        }
    }
}

impl From<PortError> for ContactError {
    fn from(err: PortError) -> Self {
        ContactError::Storage(err)
    }
}

impl From<validator::ValidationErrors> for ContactError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ContactError::Constraint(errors.to_string())
    }
}

impl ContactError {
    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContactError::ContactNotFound(_)
            | ContactError::AddressNotFound(_)
            | ContactError::PhoneNotFound(_)
            | ContactError::EmailNotFound(_)
            | ContactError::IdentityNotFound(_)
            | ContactError::EmploymentNotFound(_)
            | ContactError::RestrictionNotFound(_) => ErrorCategory::NotFound,
            ContactError::UnsupportedValue { .. } | ContactError::Constraint(_) => {
                ErrorCategory::Validation
            }
            ContactError::Reference(err) => err.category(),
            ContactError::Storage(err) => match err {
                PortError::NotFound { .. } => ErrorCategory::NotFound,
                PortError::Conflict { .. } => ErrorCategory::Conflict,
                PortError::Validation { .. } => ErrorCategory::Validation,
                _ => ErrorCategory::Internal,
            },
            ContactError::Publish(err) => err.category(),
        }
    }
}
