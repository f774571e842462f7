//! Contact phone numbers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, ContactPhoneId, Patch};

/// A phone number owned by a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPhone {
    pub id: ContactPhoneId,
    pub contact_id: ContactId,
    /// Coded phone classification (PHONE_TYPE group)
    pub phone_type_code: String,
    pub phone_number: String,
    pub ext_number: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactPhone {
    pub fn new(
        contact_id: ContactId,
        request: CreatePhoneRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactPhoneId::new_v7(),
            contact_id,
            phone_type_code: request.phone_type_code,
            phone_number: request.phone_number,
            ext_number: request.ext_number,
            created_by: created_by.into(),
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// Request for creating a phone number
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhoneRequest {
    pub phone_type_code: String,
    #[validate(length(min = 1, max = 40))]
    pub phone_number: String,
    #[validate(length(max = 7))]
    pub ext_number: Option<String>,
}

/// Request for partially updating a phone number. Type and number are
/// non-nullable; the extension may be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchPhoneRequest {
    #[serde(default)]
    pub phone_type_code: Patch<String>,
    #[serde(default)]
    pub phone_number: Patch<String>,
    #[serde(default)]
    pub ext_number: Patch<String>,
}
