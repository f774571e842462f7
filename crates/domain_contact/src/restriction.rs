//! Contact-global restrictions
//!
//! A contact-global restriction applies to the contact across every
//! prisoner relationship. It never blocks deletion of an individual
//! relationship; only relationship-scoped restrictions do that.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, ContactRestrictionId, Patch};

/// A restriction applying to the contact globally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRestriction {
    pub id: ContactRestrictionId,
    pub contact_id: ContactId,
    /// Coded restriction classification (RESTRICTION group)
    pub restriction_type_code: String,
    pub start_date: NaiveDate,
    /// Restrictions expire rather than being deleted
    pub expiry_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactRestriction {
    pub fn new(
        contact_id: ContactId,
        request: CreateContactRestrictionRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ContactRestrictionId::new_v7(),
            contact_id,
            restriction_type_code: request.restriction_type_code,
            start_date: request.start_date,
            expiry_date: request.expiry_date,
            comments: request.comments,
            created_by: created_by.into(),
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    /// Returns true if the restriction has no expiry date or expires after
    /// the given date
    pub fn is_in_effect_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.expiry_date.map_or(true, |expiry| expiry >= date)
    }

    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// Request for creating a contact-global restriction
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRestrictionRequest {
    pub restriction_type_code: String,
    pub start_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    #[validate(length(max = 240))]
    pub comments: Option<String>,
}

/// Request for partially updating a restriction. The type and start date
/// are non-nullable; expiry and comments may be cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchContactRestrictionRequest {
    #[serde(default)]
    pub restriction_type_code: Patch<String>,
    #[serde(default)]
    pub start_date: Patch<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Patch<NaiveDate>,
    #[serde(default)]
    pub comments: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_effect_on() {
        let restriction = ContactRestriction::new(
            ContactId::new(),
            CreateContactRestrictionRequest {
                restriction_type_code: "BAN".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiry_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
                comments: None,
            },
            "OFFICER1",
        );

        assert!(restriction.is_in_effect_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!restriction.is_in_effect_on(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert!(!restriction.is_in_effect_on(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }

    #[test]
    fn test_open_ended_restriction_never_expires() {
        let restriction = ContactRestriction::new(
            ContactId::new(),
            CreateContactRestrictionRequest {
                restriction_type_code: "CCTV".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                expiry_date: None,
                comments: None,
            },
            "OFFICER1",
        );

        assert!(restriction.is_in_effect_on(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()));
    }
}
