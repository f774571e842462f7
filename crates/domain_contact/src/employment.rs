//! Contact employments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactEmploymentId, ContactId, Patch};

/// An employment record for a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEmployment {
    pub id: ContactEmploymentId,
    pub contact_id: ContactId,
    pub employer_name: String,
    pub occupation: Option<String>,
    /// Whether this is a current employment
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactEmployment {
    pub fn new(
        contact_id: ContactId,
        request: CreateEmploymentRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactEmploymentId::new_v7(),
            contact_id,
            employer_name: request.employer_name,
            occupation: request.occupation,
            active: request.active,
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

/// Request for recording an employment
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmploymentRequest {
    #[validate(length(min = 1, max = 100))]
    pub employer_name: String,
    #[validate(length(max = 40))]
    pub occupation: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request for partially updating an employment. Employer and the active
/// flag are non-nullable; the occupation may be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEmploymentRequest {
    #[serde(default)]
    pub employer_name: Patch<String>,
    #[serde(default)]
    pub occupation: Patch<String>,
    #[serde(default)]
    pub active: Patch<bool>,
}
