//! End-to-end scenarios exercising every service against shared in-memory
//! storage and a single capturing publisher

use core_kernel::Patch;
use outbound_events::OutboundEventKind;
use test_utils::assertions::{assert_event_count, assert_single_event_for, assert_total_events};
use test_utils::fixtures::{officer_context, prisoner_number};
use test_utils::{AddressBuilder, ContactBuilder, RelationshipBuilder, TestAssembly};

#[tokio::test]
async fn test_primary_address_handover_end_to_end() {
    let assembly = TestAssembly::new().await;
    let context = officer_context();

    // Create contact
    let contact = assembly
        .contacts
        .create_contact(ContactBuilder::new().build_request(), &context)
        .await
        .unwrap();

    // Create address A with primary = true
    let address_a = assembly
        .contacts
        .create_address(contact.id, AddressBuilder::new().primary().build(), &context)
        .await
        .unwrap();

    // Create address B with primary = true; A must lose the flag
    let address_b = assembly
        .contacts
        .create_address(
            contact.id,
            AddressBuilder::new().primary().with_postcode("M1 2AB").build(),
            &context,
        )
        .await
        .unwrap();

    let addresses = assembly.contacts.find_addresses(contact.id).await.unwrap();
    let stored_a = addresses.iter().find(|a| a.id == address_a.id).unwrap();
    let stored_b = addresses.iter().find(|a| a.id == address_b.id).unwrap();
    assert!(!stored_a.primary_address);
    assert!(stored_b.primary_address);

    // Events: one contact create, two address creates, and exactly one
    // address update (for the displaced holder A)
    assert_event_count(&assembly.publisher, OutboundEventKind::ContactCreated, 1).await;
    assert_event_count(&assembly.publisher, OutboundEventKind::ContactAddressCreated, 2).await;
    assert_single_event_for(
        &assembly.publisher,
        OutboundEventKind::ContactAddressUpdated,
        address_a.id,
    )
    .await;
    assert_total_events(&assembly.publisher, 4).await;
}

#[tokio::test]
async fn test_full_contact_onboarding_event_stream() {
    let assembly = TestAssembly::new().await;
    let context = officer_context();

    let contact = assembly
        .contacts
        .create_contact(ContactBuilder::new().with_random_name().build_request(), &context)
        .await
        .unwrap();

    assembly
        .contacts
        .create_address(contact.id, AddressBuilder::new().primary().mail().build(), &context)
        .await
        .unwrap();

    let relationship = assembly
        .relationships
        .create_relationship(
            RelationshipBuilder::new(contact.id).next_of_kin().build_request(),
            &context,
        )
        .await
        .unwrap();

    assembly
        .prisoner_profile
        .set_domestic_status(prisoner_number(), Some("M".to_string()), &context)
        .await
        .unwrap();

    // One event per mutation, no more
    assert_event_count(&assembly.publisher, OutboundEventKind::ContactCreated, 1).await;
    assert_event_count(&assembly.publisher, OutboundEventKind::ContactAddressCreated, 1).await;
    assert_event_count(&assembly.publisher, OutboundEventKind::PrisonerContactCreated, 1).await;
    assert_event_count(&assembly.publisher, OutboundEventKind::DomesticStatusCreated, 1).await;
    assert_total_events(&assembly.publisher, 4).await;

    // The relationship event references both people
    let events = assembly
        .publisher
        .events_of_kind(OutboundEventKind::PrisonerContactCreated)
        .await;
    assert_eq!(events[0].person_reference.contact_id, Some(contact.id));
    assert_eq!(
        events[0].person_reference.prisoner_number,
        Some(prisoner_number())
    );
    assert_eq!(events[0].entity_id, relationship.id.to_string());
}

#[tokio::test]
async fn test_historical_relationship_does_not_block_new_term() {
    use domain_relationship::RelationshipPort;

    let assembly = TestAssembly::new().await;
    let context = officer_context();

    let contact = assembly
        .contacts
        .create_contact(ContactBuilder::new().build_request(), &context)
        .await
        .unwrap();

    // Seed an earlier-term row directly into storage
    let historical = RelationshipBuilder::new(contact.id).historical().build();
    assembly
        .relationship_port
        .save_relationship(&historical)
        .await
        .unwrap();

    // The same tuple can be created for the current term
    let relationship = assembly
        .relationships
        .create_relationship(RelationshipBuilder::new(contact.id).build_request(), &context)
        .await
        .unwrap();

    let current = assembly
        .relationships
        .list_for_prisoner(&prisoner_number())
        .await
        .unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, relationship.id);
}

#[tokio::test]
async fn test_patch_and_versioning_interplay() {
    let assembly = TestAssembly::new().await;
    let context = officer_context();

    let contact = assembly
        .contacts
        .create_contact(ContactBuilder::new().build_request(), &context)
        .await
        .unwrap();
    let relationship = assembly
        .relationships
        .create_relationship(RelationshipBuilder::new(contact.id).build_request(), &context)
        .await
        .unwrap();
    assembly.publisher.clear().await;

    // Deactivate the relationship: one update event
    assembly
        .relationships
        .patch_relationship(
            relationship.id,
            domain_relationship::PatchRelationshipRequest {
                active: Patch::Value(false),
                ..Default::default()
            },
            &context,
        )
        .await
        .unwrap();

    // Record then clear the domestic status: two creation events
    assembly
        .prisoner_profile
        .set_domestic_status(prisoner_number(), Some("S".to_string()), &context)
        .await
        .unwrap();
    assembly
        .prisoner_profile
        .set_domestic_status(prisoner_number(), None, &context)
        .await
        .unwrap();

    let current = assembly
        .prisoner_profile
        .current_domestic_status(&prisoner_number())
        .await
        .unwrap();
    assert!(current.value.is_none());
    let history = assembly
        .prisoner_profile
        .domestic_status_history(&prisoner_number())
        .await
        .unwrap();
    assert_eq!(history.len(), 2);

    assert_event_count(&assembly.publisher, OutboundEventKind::PrisonerContactUpdated, 1).await;
    assert_event_count(&assembly.publisher, OutboundEventKind::DomesticStatusCreated, 2).await;
    assert_total_events(&assembly.publisher, 3).await;
}
