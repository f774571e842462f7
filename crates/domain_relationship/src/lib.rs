//! Prisoner-Contact Relationship Domain
//!
//! This crate manages the relationships between contacts and prisoners:
//! creation with duplicate detection over the relationship tuple, tri-state
//! partial updates that re-check the tuple on code changes, soft
//! activation/deactivation, and hard deletion gated on relationship-scoped
//! restrictions.
//!
//! # Uniqueness
//!
//! At most one current-term relationship may exist per (contact, prisoner,
//! relationship type, relationship to prisoner) tuple. Relationships from a
//! prisoner's earlier custody terms are retained for history, excluded from
//! the duplicate check, and excluded from default listings.

pub mod error;
pub mod ports;
pub mod relationship;
pub mod restriction;
pub mod service;

pub use error::RelationshipError;
pub use ports::RelationshipPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockRelationshipPort;
pub use relationship::{
    CreateRelationshipRequest, PatchRelationshipRequest, PrisonerContactRelationship,
    RelationshipTuple,
};
pub use restriction::{
    CreateRelationshipRestrictionRequest, PatchRelationshipRestrictionRequest,
    RelationshipRestriction,
};
pub use service::RelationshipService;
