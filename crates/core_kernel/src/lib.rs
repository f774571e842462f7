//! Core Kernel - Foundational types and utilities for the custody-contacts system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers and the prisoner-number value type
//! - The tri-state `Patch` field used by every partial-update operation
//! - Ports-and-adapters infrastructure shared by all domains
//! - Runtime and adapter-source configuration

pub mod config;
pub mod error;
pub mod identifiers;
pub mod patch;
pub mod ports;
pub mod registry;

pub use config::CoreConfig;
pub use error::{CoreError, ErrorCategory};
pub use identifiers::{
    ContactAddressId, ContactEmailId, ContactEmploymentId, ContactId, ContactIdentityId,
    ContactPhoneId, ContactRestrictionId, PrisonerNumber, PrisonerNumberError, RelationshipId,
    RelationshipRestrictionId,
};
pub use patch::{Patch, PatchError};
pub use ports::{DomainPort, PortError, RequestContext, Source};
pub use registry::{AdapterSource, DomainConfig, ExternalConfig};
