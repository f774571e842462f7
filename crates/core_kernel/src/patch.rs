//! Tri-state fields for partial updates
//!
//! Every optional field in a patch request is in one of three states: the
//! client did not mention it, the client explicitly sent null, or the client
//! sent a value. A plain `Option<T>` collapses the first two, so patch
//! requests model their fields as [`Patch<T>`] instead.
//!
//! Deserialization relies on `#[serde(default)]` at the field site: a field
//! that is missing from the payload deserializes to [`Patch::Absent`], an
//! explicit `null` to [`Patch::Null`], and anything else to
//! [`Patch::Value`].
//!
//! # Examples
//!
//! ```rust
//! use core_kernel::Patch;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct PatchRequest {
//!     #[serde(default)]
//!     comments: Patch<String>,
//! }
//!
//! let omitted: PatchRequest = serde_json::from_str("{}").unwrap();
//! assert!(omitted.comments.is_absent());
//!
//! let cleared: PatchRequest = serde_json::from_str(r#"{"comments": null}"#).unwrap();
//! assert_eq!(cleared.comments, Patch::Null);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A single field of a partial-update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// The client did not mention the field; the stored value is untouched.
    Absent,
    /// The client explicitly asked for the field to be cleared.
    Null,
    /// The client asked for the field to be set to this value.
    Value(T),
}

// Not derived: the derive would demand T: Default, and Absent needs none.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

/// Error raised when a patch field receives an unsupported state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// Explicit null was sent for a field that cannot be cleared
    #[error("Unsupported value for {field}: null is not supported")]
    NullNotAllowed { field: &'static str },
}

impl<T> Patch<T> {
    /// Returns true if the field was not mentioned by the client
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Returns a reference to the value if one was supplied
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Resolves the field against the currently stored value.
    ///
    /// `Absent` keeps the stored value, `Null` clears it, and `Value`
    /// replaces it.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Absent => current,
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }

    /// Rejects explicit null for fields that are non-nullable by business
    /// rule. `Absent` and `Value` pass through untouched.
    pub fn required(self, field: &'static str) -> Result<Patch<T>, PatchError> {
        match self {
            Patch::Null => Err(PatchError::NullNotAllowed { field }),
            other => Ok(other),
        }
    }

    /// Maps the contained value, preserving `Absent` and `Null`
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Converts `&Patch<T>` to `Patch<&T>`
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }
}

impl<T: PartialEq> Patch<T> {
    /// Returns true if applying this field would change the stored value
    pub fn changes(&self, current: &Option<T>) -> bool {
        match self {
            Patch::Absent => false,
            Patch::Null => current.is_some(),
            Patch::Value(v) => current.as_ref() != Some(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

// A present field is either null or a value; a missing field never reaches
// the deserializer and is produced by #[serde(default)] instead.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Absent cannot be represented in place; callers skip it with
            // skip_serializing_if = "Patch::is_absent".
            Patch::Absent | Patch::Null => serializer.serialize_none(),
            Patch::Value(v) => serializer.serialize_some(v),
        }
    }
}
