//! Test Utilities
//!
//! Shared builders, fixtures, assertion helpers and a full in-memory
//! service assembly for the custody-contacts test suite.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::{AddressBuilder, ContactBuilder, RelationshipBuilder};

use std::sync::Arc;

use domain_contact::{ContactService, MockContactPort};
use domain_prisoner::{
    InMemoryVersionedStore, MockPrisonerDirectory, PrisonerProfileService,
};
use domain_reference::InMemoryReferenceData;
use domain_relationship::{MockRelationshipPort, RelationshipService};
use outbound_events::CapturingPublisher;

/// A complete in-memory assembly of every service, sharing one capturing
/// publisher so tests can assert event cardinality across domains.
pub struct TestAssembly {
    pub contacts: ContactService,
    pub relationships: RelationshipService,
    pub prisoner_profile: PrisonerProfileService,
    pub contact_port: Arc<MockContactPort>,
    pub relationship_port: Arc<MockRelationshipPort>,
    pub directory: Arc<MockPrisonerDirectory>,
    pub publisher: CapturingPublisher,
}

impl TestAssembly {
    /// Builds an assembly with the canonical prisoner seeded in the
    /// directory and the standard reference codes loaded
    pub async fn new() -> Self {
        fixtures::init_tracing();

        let contact_port = Arc::new(MockContactPort::new());
        let relationship_port = Arc::new(MockRelationshipPort::new());
        let directory = Arc::new(
            MockPrisonerDirectory::with_prisoners(vec![
                fixtures::prisoner_number(),
                fixtures::other_prisoner_number(),
            ])
            .await,
        );
        let reference = Arc::new(InMemoryReferenceData::new());
        let publisher = CapturingPublisher::new();

        let contacts = ContactService::new(
            contact_port.clone(),
            reference.clone(),
            Arc::new(publisher.clone()),
        );
        let relationships = RelationshipService::new(
            relationship_port.clone(),
            contact_port.clone(),
            directory.clone(),
            reference.clone(),
            Arc::new(publisher.clone()),
        );
        let prisoner_profile = PrisonerProfileService::new(
            directory.clone(),
            Arc::new(InMemoryVersionedStore::<String>::new()),
            Arc::new(InMemoryVersionedStore::<u32>::new()),
            reference,
            Arc::new(publisher.clone()),
        );

        Self {
            contacts,
            relationships,
            prisoner_profile,
            contact_port,
            relationship_port,
            directory,
            publisher,
        }
    }
}
