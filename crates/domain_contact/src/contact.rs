//! Contact entity and mutation requests
//!
//! A contact is a person known to the platform: identity attributes plus
//! owned collections of addresses, phones, emails, identity documents,
//! employments, and contact-global restrictions. Contacts are created on
//! first write, mutated via patch, and never hard-deleted.
//!
//! # Examples
//!
//! ```rust
//! use domain_contact::contact::{Contact, CreateContactRequest};
//!
//! let request = CreateContactRequest {
//!     first_name: "Jane".to_string(),
//!     last_name: "Doe".to_string(),
//!     ..Default::default()
//! };
//! let contact = Contact::new(request, "OFFICER1");
//! assert_eq!(contact.display_name(), "Jane Doe");
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, Patch};

/// A contact (person) managed by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique contact identifier
    pub id: ContactId,
    /// Coded honorific (TITLE group)
    pub title_code: Option<String>,
    /// Legal first name
    pub first_name: String,
    /// Middle name(s), if any
    pub middle_names: Option<String>,
    /// Legal last name / surname
    pub last_name: String,
    /// Date of birth, when known
    pub date_of_birth: Option<NaiveDate>,
    /// Coded gender (GENDER group)
    pub gender_code: Option<String>,
    /// Coded preferred language (LANGUAGE group)
    pub language_code: Option<String>,
    /// Whether an interpreter is required for this contact
    pub interpreter_required: bool,
    /// Coded domestic status (DOMESTIC_STS group)
    pub domestic_status_code: Option<String>,
    /// Whether the contact is a member of staff
    pub is_staff: bool,
    /// Username that created the contact
    pub created_by: String,
    /// When the contact was created
    pub created_at: DateTime<Utc>,
    /// Username of the last update, if any
    pub updated_by: Option<String>,
    /// When the contact was last updated
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a new contact from a validated request
    pub fn new(request: CreateContactRequest, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ContactId::new_v7(),
            title_code: request.title_code,
            first_name: request.first_name,
            middle_names: request.middle_names,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            gender_code: request.gender_code,
            language_code: request.language_code,
            interpreter_required: request.interpreter_required,
            domestic_status_code: request.domestic_status_code,
            is_staff: request.is_staff,
            created_by: created_by.into(),
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    /// Returns the display name in "First Last" format
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Stamps the audit columns for an update
    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// Request for creating a new contact
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    /// Coded honorific (TITLE group)
    pub title_code: Option<String>,
    /// Legal first name
    #[validate(length(min = 1, max = 35))]
    pub first_name: String,
    /// Middle name(s), if any
    #[validate(length(max = 35))]
    pub middle_names: Option<String>,
    /// Legal last name / surname
    #[validate(length(min = 1, max = 35))]
    pub last_name: String,
    /// Date of birth, when known
    pub date_of_birth: Option<NaiveDate>,
    /// Coded gender (GENDER group)
    pub gender_code: Option<String>,
    /// Coded preferred language (LANGUAGE group)
    pub language_code: Option<String>,
    /// Whether an interpreter is required
    #[serde(default)]
    pub interpreter_required: bool,
    /// Coded domestic status (DOMESTIC_STS group)
    pub domestic_status_code: Option<String>,
    /// Whether the contact is a member of staff
    #[serde(default)]
    pub is_staff: bool,
}

/// Request for partially updating a contact.
///
/// Every field is tri-state: a field absent from the payload leaves the
/// stored value untouched, an explicit null clears it (where the field is
/// nullable), and a value replaces it. First name, last name, the staff
/// flag and the interpreter flag are non-nullable by business rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchContactRequest {
    #[serde(default)]
    pub title_code: Patch<String>,
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub middle_names: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub date_of_birth: Patch<NaiveDate>,
    #[serde(default)]
    pub gender_code: Patch<String>,
    #[serde(default)]
    pub language_code: Patch<String>,
    #[serde(default)]
    pub interpreter_required: Patch<bool>,
    #[serde(default)]
    pub domestic_status_code: Patch<String>,
    #[serde(default)]
    pub is_staff: Patch<bool>,
}
