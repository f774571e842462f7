//! Contact Management Domain
//!
//! This crate manages contacts (people known to the platform) and their
//! owned sub-resources: addresses, phone numbers, email addresses, identity
//! documents, employments, and contact-global restrictions.
//!
//! # Address exclusivity
//!
//! A contact may own any number of addresses, but at most one non-deleted
//! address holds the primary flag and at most one holds the mail flag. The
//! invariant is maintained in application code (not a trigger) so that the
//! update event emitted for every displaced sibling stays observable:
//!
//! ```rust,ignore
//! let address = service
//!     .create_address(contact_id, CreateAddressRequest {
//!         primary_address: true,
//!         ..Default::default()
//!     }, &context)
//!     .await?;
//! // Any sibling that previously held the primary flag has lost it and an
//! // update event has been emitted for it.
//! ```
//!
//! # Partial updates
//!
//! Every patch request models its fields as `Patch<T>`, distinguishing
//! "field omitted" from "field explicitly cleared". Fields that are
//! non-nullable by business rule reject explicit null before any write.

pub mod address;
pub mod contact;
pub mod email;
pub mod employment;
pub mod error;
pub mod identity;
pub mod phone;
pub mod ports;
pub mod restriction;
pub mod service;

pub use address::{
    plan_flag_changes, ContactAddress, CreateAddressRequest, FlagChange, PatchAddressRequest,
};
pub use contact::{Contact, CreateContactRequest, PatchContactRequest};
pub use email::{ContactEmail, CreateEmailRequest, PatchEmailRequest};
pub use employment::{ContactEmployment, CreateEmploymentRequest, PatchEmploymentRequest};
pub use error::ContactError;
pub use identity::{ContactIdentity, CreateIdentityRequest, PatchIdentityRequest};
pub use phone::{ContactPhone, CreatePhoneRequest, PatchPhoneRequest};
pub use ports::ContactPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockContactPort;
pub use restriction::{
    ContactRestriction, CreateContactRestrictionRequest, PatchContactRestrictionRequest,
};
pub use service::ContactService;
