//! Relationship application service
//!
//! Implements the relationship lifecycle: create with duplicate detection,
//! tri-state patch with the duplicate check re-run on tuple changes, and
//! restriction-gated hard deletion. The state machine per relationship is
//! `Active ⇄ Inactive → Deleted`; the `current_term` marker is set at
//! creation and never changed here.
//!
//! All invariant checks happen before any write. The storage layer's unique
//! constraint backs the duplicate check, so a concurrent create that slips
//! past the pre-write check still surfaces as a duplicate.

use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{
    ContactId, Patch, PrisonerNumber, RelationshipId, RelationshipRestrictionId, RequestContext,
};
use domain_contact::ContactPort;
use domain_prisoner::PrisonerDirectory;
use domain_reference::{ReferenceGroup, ReferenceValidator};
use outbound_events::{EventPublisher, OutboundEvent, OutboundEventKind, PersonReference};

use crate::error::RelationshipError;
use crate::ports::RelationshipPort;
use crate::relationship::{
    CreateRelationshipRequest, PatchRelationshipRequest, PrisonerContactRelationship,
    RelationshipTuple,
};
use crate::restriction::{
    CreateRelationshipRestrictionRequest, PatchRelationshipRestrictionRequest,
    RelationshipRestriction,
};

/// Application service for prisoner-contact relationships
pub struct RelationshipService {
    port: Arc<dyn RelationshipPort>,
    contacts: Arc<dyn ContactPort>,
    directory: Arc<dyn PrisonerDirectory>,
    reference: Arc<dyn ReferenceValidator>,
    publisher: Arc<dyn EventPublisher>,
}

impl RelationshipService {
    /// Creates a new relationship service
    pub fn new(
        port: Arc<dyn RelationshipPort>,
        contacts: Arc<dyn ContactPort>,
        directory: Arc<dyn PrisonerDirectory>,
        reference: Arc<dyn ReferenceValidator>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            port,
            contacts,
            directory,
            reference,
            publisher,
        }
    }

    /// Retrieves a relationship by ID
    pub async fn get_relationship(
        &self,
        id: RelationshipId,
    ) -> Result<PrisonerContactRelationship, RelationshipError> {
        self.fetch_relationship(id).await
    }

    /// Lists a prisoner's current-term relationships
    pub async fn list_for_prisoner(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Vec<PrisonerContactRelationship>, RelationshipError> {
        Ok(self.port.find_by_prisoner(prisoner_number, true).await?)
    }

    /// Lists a prisoner's relationships across every custody term
    pub async fn list_all_terms_for_prisoner(
        &self,
        prisoner_number: &PrisonerNumber,
    ) -> Result<Vec<PrisonerContactRelationship>, RelationshipError> {
        Ok(self.port.find_by_prisoner(prisoner_number, false).await?)
    }

    /// Lists a contact's relationships
    pub async fn list_for_contact(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<PrisonerContactRelationship>, RelationshipError> {
        Ok(self.port.find_by_contact(contact_id).await?)
    }

    /// Creates a relationship and emits a creation event.
    ///
    /// Fails with `DuplicateRelationship` if a current-term relationship
    /// with the identical tuple already exists; rows from earlier terms do
    /// not block (re-linking a contact for a new custody term is allowed).
    #[instrument(skip(self, request, context), fields(prisoner_number = %request.prisoner_number))]
    pub async fn create_relationship(
        &self,
        request: CreateRelationshipRequest,
        context: &RequestContext,
    ) -> Result<PrisonerContactRelationship, RelationshipError> {
        use validator::Validate;
        request.validate()?;
        self.validate_relationship_codes(
            &request.relationship_type_code,
            &request.relationship_to_prisoner_code,
        )
        .await?;

        if !self.contacts.contact_exists(request.contact_id).await? {
            return Err(RelationshipError::ContactNotFound(request.contact_id));
        }
        if !self.directory.exists(&request.prisoner_number).await? {
            return Err(RelationshipError::PrisonerNotFound(
                request.prisoner_number.clone(),
            ));
        }

        let tuple = RelationshipTuple {
            contact_id: request.contact_id,
            prisoner_number: request.prisoner_number.clone(),
            relationship_type_code: request.relationship_type_code.clone(),
            relationship_to_prisoner_code: request.relationship_to_prisoner_code.clone(),
        };
        if let Some(existing) = self.port.find_current_term_duplicate(&tuple, None).await? {
            debug!(%existing, "Duplicate relationship rejected");
            return Err(RelationshipError::DuplicateRelationship(tuple));
        }

        let relationship = PrisonerContactRelationship::new(request, &context.username);
        self.save_guarding_duplicates(&relationship).await?;
        debug!(relationship_id = %relationship.id, "Created relationship");

        self.emit(
            OutboundEventKind::PrisonerContactCreated,
            context,
            relationship.id,
            PersonReference::relationship(
                relationship.contact_id,
                relationship.prisoner_number.clone(),
            ),
        )
        .await?;

        Ok(relationship)
    }

    /// Partially updates a relationship and emits one update event.
    ///
    /// A change to either relationship code re-runs the duplicate check
    /// against the new tuple, excluding the row being patched.
    #[instrument(skip(self, request, context), fields(relationship_id = %id))]
    pub async fn patch_relationship(
        &self,
        id: RelationshipId,
        request: PatchRelationshipRequest,
        context: &RequestContext,
    ) -> Result<PrisonerContactRelationship, RelationshipError> {
        let mut relationship = self.fetch_relationship(id).await?;

        // Validate every field before any of them is applied
        let type_code = request
            .relationship_type_code
            .required("relationshipTypeCode")?;
        let to_prisoner_code = request
            .relationship_to_prisoner_code
            .required("relationshipToPrisonerCode")?;
        let next_of_kin = request.next_of_kin.required("nextOfKin")?;
        let emergency_contact = request.emergency_contact.required("emergencyContact")?;
        let approved_visitor = request.approved_visitor.required("approvedVisitor")?;
        let active = request.active.required("active")?;
        ensure_max_len("comments", request.comments.value(), 240)?;

        let new_type = match type_code.value() {
            Some(v) => v.clone(),
            None => relationship.relationship_type_code.clone(),
        };
        let new_to_prisoner = match to_prisoner_code.value() {
            Some(v) => v.clone(),
            None => relationship.relationship_to_prisoner_code.clone(),
        };
        let tuple_changed = new_type != relationship.relationship_type_code
            || new_to_prisoner != relationship.relationship_to_prisoner_code;

        if tuple_changed {
            self.validate_relationship_codes(&new_type, &new_to_prisoner)
                .await?;

            let new_tuple = RelationshipTuple {
                contact_id: relationship.contact_id,
                prisoner_number: relationship.prisoner_number.clone(),
                relationship_type_code: new_type.clone(),
                relationship_to_prisoner_code: new_to_prisoner.clone(),
            };
            if self
                .port
                .find_current_term_duplicate(&new_tuple, Some(id))
                .await?
                .is_some()
            {
                debug!("Patch to colliding tuple rejected");
                return Err(RelationshipError::DuplicateRelationship(new_tuple));
            }
        }

        relationship.relationship_type_code = new_type;
        relationship.relationship_to_prisoner_code = new_to_prisoner;
        if let Patch::Value(v) = next_of_kin {
            relationship.next_of_kin = v;
        }
        if let Patch::Value(v) = emergency_contact {
            relationship.emergency_contact = v;
        }
        if let Patch::Value(v) = approved_visitor {
            relationship.approved_visitor = v;
        }
        if let Patch::Value(v) = active {
            relationship.active = v;
        }
        relationship.comments = request.comments.apply(relationship.comments);
        relationship.touch(&context.username);
        self.save_guarding_duplicates(&relationship).await?;
        debug!("Patched relationship");

        self.emit(
            OutboundEventKind::PrisonerContactUpdated,
            context,
            relationship.id,
            PersonReference::relationship(
                relationship.contact_id,
                relationship.prisoner_number.clone(),
            ),
        )
        .await?;

        Ok(relationship)
    }

    /// Hard-deletes a relationship and emits a deletion event.
    ///
    /// Rejected with `RestrictionsPreventDeletion` while any
    /// relationship-scoped restriction exists. Contact-global restrictions
    /// never block and are untouched by the deletion.
    #[instrument(skip(self, context), fields(relationship_id = %id))]
    pub async fn delete_relationship(
        &self,
        id: RelationshipId,
        context: &RequestContext,
    ) -> Result<(), RelationshipError> {
        let relationship = self.fetch_relationship(id).await?;

        let restrictions = self.port.find_restrictions(id).await?;
        if !restrictions.is_empty() {
            debug!(count = restrictions.len(), "Deletion blocked by restrictions");
            return Err(RelationshipError::RestrictionsPreventDeletion(id));
        }

        self.port.delete_relationship(id).await?;
        debug!("Deleted relationship");

        self.emit(
            OutboundEventKind::PrisonerContactDeleted,
            context,
            relationship.id,
            PersonReference::relationship(
                relationship.contact_id,
                relationship.prisoner_number.clone(),
            ),
        )
        .await?;

        Ok(())
    }

    // ========================================================================
    // Relationship-scoped restrictions
    // ========================================================================

    /// Lists the restrictions scoped to a relationship
    pub async fn find_restrictions(
        &self,
        relationship_id: RelationshipId,
    ) -> Result<Vec<RelationshipRestriction>, RelationshipError> {
        self.fetch_relationship(relationship_id).await?;
        Ok(self.port.find_restrictions(relationship_id).await?)
    }

    /// Creates a relationship-scoped restriction and emits a creation event
    #[instrument(skip(self, request, context), fields(relationship_id = %relationship_id))]
    pub async fn create_restriction(
        &self,
        relationship_id: RelationshipId,
        request: CreateRelationshipRestrictionRequest,
        context: &RequestContext,
    ) -> Result<RelationshipRestriction, RelationshipError> {
        use validator::Validate;
        let relationship = self.fetch_relationship(relationship_id).await?;
        request.validate()?;
        self.reference
            .validate(ReferenceGroup::RestrictionType, &request.restriction_type_code)
            .await?;
        ensure_date_order(request.start_date, request.expiry_date)?;

        let restriction =
            RelationshipRestriction::new(relationship_id, request, &context.username);
        self.port.save_restriction(&restriction).await?;

        self.emit(
            OutboundEventKind::PrisonerContactRestrictionCreated,
            context,
            restriction.id,
            PersonReference::relationship(
                relationship.contact_id,
                relationship.prisoner_number.clone(),
            ),
        )
        .await?;

        Ok(restriction)
    }

    /// Partially updates a relationship-scoped restriction and emits one
    /// update event
    #[instrument(skip(self, request, context), fields(restriction_id = %restriction_id))]
    pub async fn patch_restriction(
        &self,
        restriction_id: RelationshipRestrictionId,
        request: PatchRelationshipRestrictionRequest,
        context: &RequestContext,
    ) -> Result<RelationshipRestriction, RelationshipError> {
        let mut restriction = self.fetch_restriction(restriction_id).await?;
        let relationship = self.fetch_relationship(restriction.relationship_id).await?;

        let restriction_type = request.restriction_type_code.required("restrictionTypeCode")?;
        let start_date = request.start_date.required("startDate")?;
        ensure_max_len("comments", request.comments.value(), 240)?;
        if let Patch::Value(code) = &restriction_type {
            self.reference
                .validate(ReferenceGroup::RestrictionType, code)
                .await?;
        }

        let new_start = match start_date {
            Patch::Value(v) => v,
            _ => restriction.start_date,
        };
        let new_expiry = request.expiry_date.apply(restriction.expiry_date);
        ensure_date_order(new_start, new_expiry)?;

        if let Patch::Value(v) = restriction_type {
            restriction.restriction_type_code = v;
        }
        restriction.start_date = new_start;
        restriction.expiry_date = new_expiry;
        restriction.comments = request.comments.apply(restriction.comments);
        restriction.touch(&context.username);
        self.port.save_restriction(&restriction).await?;

        self.emit(
            OutboundEventKind::PrisonerContactRestrictionUpdated,
            context,
            restriction.id,
            PersonReference::relationship(
                relationship.contact_id,
                relationship.prisoner_number.clone(),
            ),
        )
        .await?;

        Ok(restriction)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn emit(
        &self,
        kind: OutboundEventKind,
        context: &RequestContext,
        entity_id: impl ToString,
        person_reference: PersonReference,
    ) -> Result<(), RelationshipError> {
        self.publisher
            .publish(OutboundEvent::new(kind, context, entity_id, person_reference))
            .await?;
        Ok(())
    }

    /// Persists a relationship, translating the storage unique-constraint
    /// conflict into `DuplicateRelationship` so a concurrent writer race
    /// fails the same way as the pre-write check
    async fn save_guarding_duplicates(
        &self,
        relationship: &PrisonerContactRelationship,
    ) -> Result<(), RelationshipError> {
        self.port
            .save_relationship(relationship)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    RelationshipError::DuplicateRelationship(relationship.tuple())
                } else {
                    RelationshipError::Storage(e)
                }
            })
    }

    async fn fetch_relationship(
        &self,
        id: RelationshipId,
    ) -> Result<PrisonerContactRelationship, RelationshipError> {
        self.port.get_relationship(id).await.map_err(|e| {
            if e.is_not_found() {
                RelationshipError::RelationshipNotFound(id)
            } else {
                RelationshipError::Storage(e)
            }
        })
    }

    async fn fetch_restriction(
        &self,
        id: RelationshipRestrictionId,
    ) -> Result<RelationshipRestriction, RelationshipError> {
        self.port.get_restriction(id).await.map_err(|e| {
            if e.is_not_found() {
                RelationshipError::RestrictionNotFound(id)
            } else {
                RelationshipError::Storage(e)
            }
        })
    }

    /// Validates the type code, then the to-prisoner code against the group
    /// the type selects (social codes for social relationships, official
    /// codes for official ones)
    async fn validate_relationship_codes(
        &self,
        type_code: &str,
        to_prisoner_code: &str,
    ) -> Result<(), RelationshipError> {
        self.reference
            .validate(ReferenceGroup::RelationshipType, type_code)
            .await?;
        let group = if type_code == "O" {
            ReferenceGroup::OfficialRelationship
        } else {
            ReferenceGroup::SocialRelationship
        };
        self.reference.validate(group, to_prisoner_code).await?;
        Ok(())
    }
}

fn ensure_max_len(
    field: &'static str,
    value: Option<&String>,
    max: usize,
) -> Result<(), RelationshipError> {
    match value {
        Some(v) if v.chars().count() > max => Err(RelationshipError::Constraint(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn ensure_date_order(
    start: chrono::NaiveDate,
    expiry: Option<chrono::NaiveDate>,
) -> Result<(), RelationshipError> {
    match expiry {
        Some(expiry) if expiry < start => Err(RelationshipError::Constraint(
            "expiryDate must not be before startDate".to_string(),
        )),
        _ => Ok(()),
    }
}
