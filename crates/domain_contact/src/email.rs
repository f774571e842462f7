//! Contact email addresses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactEmailId, ContactId, Patch};

/// An email address owned by a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEmail {
    pub id: ContactEmailId,
    pub contact_id: ContactId,
    pub email_address: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactEmail {
    pub fn new(
        contact_id: ContactId,
        request: CreateEmailRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactEmailId::new_v7(),
            contact_id,
            email_address: request.email_address,
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

/// Request for creating an email address
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailRequest {
    #[validate(email, length(max = 240))]
    pub email_address: String,
}

/// Request for partially updating an email address
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEmailRequest {
    #[serde(default)]
    pub email_address: Patch<String>,
}
