//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Contact domain identifiers
define_id!(ContactId, "CNT");
define_id!(ContactAddressId, "ADDR");
define_id!(ContactPhoneId, "PHN");
define_id!(ContactEmailId, "EML");
define_id!(ContactIdentityId, "IDN");
define_id!(ContactEmploymentId, "EMP");
define_id!(ContactRestrictionId, "CRST");

// Relationship domain identifiers
define_id!(RelationshipId, "REL");
define_id!(RelationshipRestrictionId, "RRST");

/// A prisoner number as issued by the prisoner directory.
///
/// Format: one letter, four digits, two letters (e.g. `A1234BC`). The core
/// never generates these; they arrive from callers and are validated at the
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrisonerNumber(String);

/// Error returned when parsing a malformed prisoner number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid prisoner number: {0}")]
pub struct PrisonerNumberError(pub String);

impl PrisonerNumber {
    /// Parses and validates a prisoner number
    pub fn new(value: impl Into<String>) -> Result<Self, PrisonerNumberError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(PrisonerNumberError(value))
        }
    }

    /// Returns the prisoner number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(value: &str) -> bool {
        let bytes = value.as_bytes();
        bytes.len() == 7
            && bytes[0].is_ascii_uppercase()
            && bytes[1..5].iter().all(|b| b.is_ascii_digit())
            && bytes[5..7].iter().all(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for PrisonerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PrisonerNumber {
    type Err = PrisonerNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PrisonerNumber {
    type Error = PrisonerNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrisonerNumber> for String {
    fn from(number: PrisonerNumber) -> String {
        number.0
    }
}
