//! Relationship-scoped restrictions
//!
//! A relationship-scoped restriction applies to one prisoner-contact
//! relationship only. Its presence blocks hard deletion of that
//! relationship; soft-deactivation stays allowed. Contact-global
//! restrictions live in the contact domain and never block deletion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Patch, RelationshipId, RelationshipRestrictionId};

/// A restriction scoped to one prisoner-contact relationship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRestriction {
    pub id: RelationshipRestrictionId,
    pub relationship_id: RelationshipId,
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

impl RelationshipRestriction {
    pub fn new(
        relationship_id: RelationshipId,
        request: CreateRelationshipRestrictionRequest,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RelationshipRestrictionId::new_v7(),
            relationship_id,
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

    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// Request for creating a relationship-scoped restriction
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRestrictionRequest {
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
pub struct PatchRelationshipRestrictionRequest {
    #[serde(default)]
    pub restriction_type_code: Patch<String>,
    #[serde(default)]
    pub start_date: Patch<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Patch<NaiveDate>,
    #[serde(default)]
    pub comments: Patch<String>,
}
