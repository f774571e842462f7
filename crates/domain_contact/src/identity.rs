//! Contact identity documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, ContactIdentityId, Patch};

/// An identity document held for a contact (driving licence, passport, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactIdentity {
    pub id: ContactIdentityId,
    pub contact_id: ContactId,
    /// Coded document type (ID_TYPE group)
    pub identity_type_code: String,
    pub identity_value: String,
    pub issuing_authority: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactIdentity {
    pub fn new(
        contact_id: ContactId,
        request: CreateIdentityRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactIdentityId::new_v7(),
            contact_id,
            identity_type_code: request.identity_type_code,
            identity_value: request.identity_value,
            issuing_authority: request.issuing_authority,
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

/// Request for recording an identity document
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdentityRequest {
    pub identity_type_code: String,
    #[validate(length(min = 1, max = 20))]
    pub identity_value: String,
    #[validate(length(max = 40))]
    pub issuing_authority: Option<String>,
}

/// Request for partially updating an identity document. Type and value are
/// non-nullable; the issuing authority may be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchIdentityRequest {
    #[serde(default)]
    pub identity_type_code: Patch<String>,
    #[serde(default)]
    pub identity_value: Patch<String>,
    #[serde(default)]
    pub issuing_authority: Patch<String>,
}
