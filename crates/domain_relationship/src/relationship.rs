//! The prisoner-contact relationship entity
//!
//! A relationship links one contact to one prisoner with a coded
//! relationship type (social or official) and a coded relationship to the
//! prisoner (mother, solicitor, ...). The (contact, prisoner, type,
//! relationship-to-prisoner) tuple is the uniqueness key among current-term
//! rows: a prisoner may not be linked to the same contact twice in the same
//! way within one term. Rows from earlier terms are retained for history
//! but excluded from duplicate checks and default listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, Patch, PrisonerNumber, RelationshipId};

/// A relationship between a contact and a prisoner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrisonerContactRelationship {
    /// Unique relationship identifier
    pub id: RelationshipId,
    /// The contact side of the relationship
    pub contact_id: ContactId,
    /// The prisoner side of the relationship
    pub prisoner_number: PrisonerNumber,
    /// Coded relationship type: social or official (RELATIONSHIP_TYPE group)
    pub relationship_type_code: String,
    /// Coded relationship to the prisoner (SOCIAL_RELATIONSHIP or
    /// OFFICIAL_RELATIONSHIP group, depending on the type)
    pub relationship_to_prisoner_code: String,
    /// Whether the contact is the prisoner's next of kin
    pub next_of_kin: bool,
    /// Whether the contact is an emergency contact for the prisoner
    pub emergency_contact: bool,
    /// Whether the contact is approved to visit the prisoner
    pub approved_visitor: bool,
    /// Soft activation state; an inactive relationship is retained
    pub active: bool,
    /// Set at creation and never changed by this core; rows from earlier
    /// custody terms carry false
    pub current_term: bool,
    /// Free-text comments
    pub comments: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PrisonerContactRelationship {
    /// Creates a new current-term relationship from a validated request
    pub fn new(request: CreateRelationshipRequest, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RelationshipId::new_v7(),
            contact_id: request.contact_id,
            prisoner_number: request.prisoner_number,
            relationship_type_code: request.relationship_type_code,
            relationship_to_prisoner_code: request.relationship_to_prisoner_code,
            next_of_kin: request.next_of_kin,
            emergency_contact: request.emergency_contact,
            approved_visitor: request.approved_visitor,
            active: true,
            current_term: true,
            comments: request.comments,
            created_by: created_by.into(),
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    /// Returns the uniqueness key of this relationship
    pub fn tuple(&self) -> RelationshipTuple {
        RelationshipTuple {
            contact_id: self.contact_id,
            prisoner_number: self.prisoner_number.clone(),
            relationship_type_code: self.relationship_type_code.clone(),
            relationship_to_prisoner_code: self.relationship_to_prisoner_code.clone(),
        }
    }

    /// Stamps the audit columns for an update
    pub fn touch(&mut self, updated_by: impl Into<String>) {
        self.updated_by = Some(updated_by.into());
        self.updated_at = Utc::now();
    }
}

/// The (contact, prisoner, type, relationship-to-prisoner) uniqueness key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipTuple {
    pub contact_id: ContactId,
    pub prisoner_number: PrisonerNumber,
    pub relationship_type_code: String,
    pub relationship_to_prisoner_code: String,
}

impl std::fmt::Display for RelationshipTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.contact_id,
            self.prisoner_number,
            self.relationship_type_code,
            self.relationship_to_prisoner_code
        )
    }
}

/// Request for creating a relationship
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipRequest {
    pub contact_id: ContactId,
    pub prisoner_number: PrisonerNumber,
    pub relationship_type_code: String,
    pub relationship_to_prisoner_code: String,
    #[serde(default)]
    pub next_of_kin: bool,
    #[serde(default)]
    pub emergency_contact: bool,
    #[serde(default)]
    pub approved_visitor: bool,
    #[validate(length(max = 240))]
    pub comments: Option<String>,
}

/// Request for partially updating a relationship.
///
/// Both codes and every boolean flag are non-nullable; only the comments
/// may be cleared. Changing either code re-runs the duplicate check against
/// the new tuple before anything is written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRelationshipRequest {
    #[serde(default)]
    pub relationship_type_code: Patch<String>,
    #[serde(default)]
    pub relationship_to_prisoner_code: Patch<String>,
    #[serde(default)]
    pub next_of_kin: Patch<bool>,
    #[serde(default)]
    pub emergency_contact: Patch<bool>,
    #[serde(default)]
    pub approved_visitor: Patch<bool>,
    #[serde(default)]
    pub active: Patch<bool>,
    #[serde(default)]
    pub comments: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRelationshipRequest {
        CreateRelationshipRequest {
            contact_id: ContactId::new(),
            prisoner_number: PrisonerNumber::new("A1234BC").unwrap(),
            relationship_type_code: "S".to_string(),
            relationship_to_prisoner_code: "MOT".to_string(),
            next_of_kin: true,
            emergency_contact: false,
            approved_visitor: false,
            comments: None,
        }
    }

    #[test]
    fn test_new_relationship_is_active_current_term() {
        let relationship = PrisonerContactRelationship::new(request(), "OFFICER1");
        assert!(relationship.active);
        assert!(relationship.current_term);
        assert!(relationship.next_of_kin);
    }

    #[test]
    fn test_tuple_equality() {
        let relationship = PrisonerContactRelationship::new(request(), "OFFICER1");
        let mut other = relationship.clone();
        other.id = RelationshipId::new();

        // Same tuple even though the rows differ
        assert_eq!(relationship.tuple(), other.tuple());

        other.relationship_to_prisoner_code = "FA".to_string();
        assert_ne!(relationship.tuple(), other.tuple());
    }

    #[test]
    fn test_patch_request_tri_state() {
        let patch: PatchRelationshipRequest =
            serde_json::from_str(r#"{"comments": null, "nextOfKin": true}"#).unwrap();

        assert_eq!(patch.comments, Patch::Null);
        assert_eq!(patch.next_of_kin, Patch::Value(true));
        assert!(patch.relationship_type_code.is_absent());
        assert!(patch.active.is_absent());
    }
}
