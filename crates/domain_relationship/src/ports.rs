//! Relationship Domain Ports
//!
//! Storage port for relationships and their scoped restrictions. The
//! storage layer owns the partial unique index over the current-term
//! relationship tuple; `save_relationship` surfaces a violation as
//! [`PortError::Conflict`], which is how a concurrent duplicate create
//! still fails as a duplicate rather than silently succeeding twice.

use async_trait::async_trait;

use core_kernel::{
    ContactId, DomainPort, PortError, PrisonerNumber, RelationshipId, RelationshipRestrictionId,
};

use crate::relationship::{PrisonerContactRelationship, RelationshipTuple};
use crate::restriction::RelationshipRestriction;

/// The main port trait for relationship domain storage
#[async_trait]
pub trait RelationshipPort: DomainPort {
    /// Retrieves a relationship by ID
    async fn get_relationship(
        &self,
        id: RelationshipId,
    ) -> Result<PrisonerContactRelationship, PortError>;

    /// Persists a relationship.
    ///
    /// Fails with [`PortError::Conflict`] if a different current-term row
    /// already holds the same tuple (the storage unique constraint).
    async fn save_relationship(
        &self,
        relationship: &PrisonerContactRelationship,
    ) -> Result<(), PortError>;

    /// Hard-deletes a relationship
    async fn delete_relationship(&self, id: RelationshipId) -> Result<(), PortError>;

    /// Finds the current-term relationship holding the given tuple, if any,
    /// optionally excluding one row (the row being patched)
    async fn find_current_term_duplicate(
        &self,
        tuple: &RelationshipTuple,
        exclude: Option<RelationshipId>,
    ) -> Result<Option<RelationshipId>, PortError>;

    /// Lists a prisoner's relationships; `current_term_only` excludes rows
    /// from earlier custody terms
    async fn find_by_prisoner(
        &self,
        prisoner_number: &PrisonerNumber,
        current_term_only: bool,
    ) -> Result<Vec<PrisonerContactRelationship>, PortError>;

    /// Lists a contact's relationships across all prisoners
    async fn find_by_contact(
        &self,
        contact_id: ContactId,
    ) -> Result<Vec<PrisonerContactRelationship>, PortError>;

    /// Retrieves a relationship-scoped restriction by ID
    async fn get_restriction(
        &self,
        id: RelationshipRestrictionId,
    ) -> Result<RelationshipRestriction, PortError>;

    /// Lists the restrictions scoped to one relationship
    async fn find_restrictions(
        &self,
        relationship_id: RelationshipId,
    ) -> Result<Vec<RelationshipRestriction>, PortError>;

    /// Persists a relationship-scoped restriction
    async fn save_restriction(
        &self,
        restriction: &RelationshipRestriction,
    ) -> Result<(), PortError>;
}

/// Mock implementation of RelationshipPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct MockState {
        relationships: HashMap<RelationshipId, PrisonerContactRelationship>,
        restrictions: HashMap<RelationshipRestrictionId, RelationshipRestriction>,
    }

    /// In-memory mock implementation of RelationshipPort
    ///
    /// Enforces the current-term tuple uniqueness on save, mirroring the
    /// storage layer's partial unique index.
    #[derive(Debug, Default, Clone)]
    pub struct MockRelationshipPort {
        state: Arc<RwLock<MockState>>,
    }

    impl MockRelationshipPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with relationships, bypassing the uniqueness
        /// check (for seeding historical rows)
        pub async fn with_relationships(
            relationships: Vec<PrisonerContactRelationship>,
        ) -> Self {
            let port = Self::new();
            {
                let mut state = port.state.write().await;
                for relationship in relationships {
                    state.relationships.insert(relationship.id, relationship);
                }
            }
            port
        }
    }

    impl DomainPort for MockRelationshipPort {}

    #[async_trait]
    impl RelationshipPort for MockRelationshipPort {
        async fn get_relationship(
            &self,
            id: RelationshipId,
        ) -> Result<PrisonerContactRelationship, PortError> {
            self.state
                .read()
                .await
                .relationships
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("PrisonerContactRelationship", id))
        }

        async fn save_relationship(
            &self,
            relationship: &PrisonerContactRelationship,
        ) -> Result<(), PortError> {
            let mut state = self.state.write().await;

            // The partial unique index: current-term rows only
            if relationship.current_term {
                let tuple = relationship.tuple();
                let collision = state.relationships.values().any(|existing| {
                    existing.id != relationship.id
                        && existing.current_term
                        && existing.tuple() == tuple
                });
                if collision {
                    return Err(PortError::conflict(format!(
                        "relationship tuple {tuple} already exists"
                    )));
                }
            }

            state
                .relationships
                .insert(relationship.id, relationship.clone());
            Ok(())
        }

        async fn delete_relationship(&self, id: RelationshipId) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .relationships
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("PrisonerContactRelationship", id))
        }

        async fn find_current_term_duplicate(
            &self,
            tuple: &RelationshipTuple,
            exclude: Option<RelationshipId>,
        ) -> Result<Option<RelationshipId>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .relationships
                .values()
                .find(|r| r.current_term && Some(r.id) != exclude && &r.tuple() == tuple)
                .map(|r| r.id))
        }

        async fn find_by_prisoner(
            &self,
            prisoner_number: &PrisonerNumber,
            current_term_only: bool,
        ) -> Result<Vec<PrisonerContactRelationship>, PortError> {
            let state = self.state.read().await;
            let mut relationships: Vec<_> = state
                .relationships
                .values()
                .filter(|r| {
                    &r.prisoner_number == prisoner_number
                        && (!current_term_only || r.current_term)
                })
                .cloned()
                .collect();
            relationships.sort_by_key(|r| r.created_at);
            Ok(relationships)
        }

        async fn find_by_contact(
            &self,
            contact_id: ContactId,
        ) -> Result<Vec<PrisonerContactRelationship>, PortError> {
            let state = self.state.read().await;
            let mut relationships: Vec<_> = state
                .relationships
                .values()
                .filter(|r| r.contact_id == contact_id)
                .cloned()
                .collect();
            relationships.sort_by_key(|r| r.created_at);
            Ok(relationships)
        }

        async fn get_restriction(
            &self,
            id: RelationshipRestrictionId,
        ) -> Result<RelationshipRestriction, PortError> {
            self.state
                .read()
                .await
                .restrictions
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("PrisonerContactRestriction", id))
        }

        async fn find_restrictions(
            &self,
            relationship_id: RelationshipId,
        ) -> Result<Vec<RelationshipRestriction>, PortError> {
            let state = self.state.read().await;
            let mut restrictions: Vec<_> = state
                .restrictions
                .values()
                .filter(|r| r.relationship_id == relationship_id)
                .cloned()
                .collect();
            restrictions.sort_by_key(|r| r.created_at);
            Ok(restrictions)
        }

        async fn save_restriction(
            &self,
            restriction: &RelationshipRestriction,
        ) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .restrictions
                .insert(restriction.id, restriction.clone());
            Ok(())
        }
    }
}
