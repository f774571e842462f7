//! Reference Data Domain
//!
//! Coded values (relationship types, address types, cities, genders, ...)
//! are owned by the platform's reference data service. This crate defines
//! the closed set of code groups, the validator port every coded field
//! passes through before a write, and an in-memory adapter seeded with the
//! standard code sets.

pub mod error;
pub mod groups;
pub mod validator;

pub use error::ReferenceError;
pub use groups::{ReferenceDescription, ReferenceGroup};
pub use validator::{InMemoryReferenceData, ReferenceValidator};
