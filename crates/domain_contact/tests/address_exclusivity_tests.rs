//! Tests for the address exclusivity invariant and its event cardinality

use std::sync::Arc;

use core_kernel::RequestContext;
use domain_contact::{
    plan_flag_changes, ContactAddress, ContactService, CreateAddressRequest, CreateContactRequest,
    MockContactPort, PatchAddressRequest,
};
use domain_reference::InMemoryReferenceData;
use outbound_events::{CapturingPublisher, OutboundEventKind};
use proptest::prelude::*;

fn context() -> RequestContext {
    RequestContext::new("OFFICER1").with_active_site("LEI")
}

async fn service_with_contact() -> (ContactService, CapturingPublisher, core_kernel::ContactId) {
    let port = Arc::new(MockContactPort::new());
    let publisher = CapturingPublisher::new();
    let service = ContactService::new(
        port,
        Arc::new(InMemoryReferenceData::new()),
        Arc::new(publisher.clone()),
    );

    let contact = service
        .create_contact(
            CreateContactRequest {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Default::default()
            },
            &context(),
        )
        .await
        .unwrap();
    publisher.clear().await;

    (service, publisher, contact.id)
}

fn primary_request() -> CreateAddressRequest {
    CreateAddressRequest {
        property: Some("12".to_string()),
        street: Some("High Street".to_string()),
        postcode: Some("S1 1AA".to_string()),
        country_code: Some("ENG".to_string()),
        primary_address: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_creating_second_primary_displaces_first() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let first = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    publisher.clear().await;

    let second = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();

    let addresses = service.find_addresses(contact_id).await.unwrap();
    let stored_first = addresses.iter().find(|a| a.id == first.id).unwrap();
    let stored_second = addresses.iter().find(|a| a.id == second.id).unwrap();
    assert!(!stored_first.primary_address);
    assert!(stored_second.primary_address);

    // One update for the displaced holder, one create for the new row
    let updates = publisher
        .events_of_kind(OutboundEventKind::ContactAddressUpdated)
        .await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].entity_id, first.id.to_string());

    let creates = publisher
        .events_of_kind(OutboundEventKind::ContactAddressCreated)
        .await;
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].entity_id, second.id.to_string());

    assert_eq!(publisher.len().await, 2);
}

#[tokio::test]
async fn test_patching_primary_emits_exactly_two_updates() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let holder = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    let other = service
        .create_address(contact_id, CreateAddressRequest::default(), &context())
        .await
        .unwrap();
    publisher.clear().await;

    service
        .patch_address(
            other.id,
            PatchAddressRequest {
                primary_address: core_kernel::Patch::Value(true),
                ..Default::default()
            },
            &context(),
        )
        .await
        .unwrap();

    let updates = publisher
        .events_of_kind(OutboundEventKind::ContactAddressUpdated)
        .await;
    assert_eq!(updates.len(), 2);
    let ids: Vec<_> = updates.iter().map(|e| e.entity_id.clone()).collect();
    assert!(ids.contains(&holder.id.to_string()));
    assert!(ids.contains(&other.id.to_string()));
    assert_eq!(publisher.len().await, 2);
}

#[tokio::test]
async fn test_no_op_flag_patch_emits_zero_events() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let holder = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    publisher.clear().await;

    // The holder re-claims the flag it already has
    service
        .patch_address(
            holder.id,
            PatchAddressRequest {
                primary_address: core_kernel::Patch::Value(true),
                ..Default::default()
            },
            &context(),
        )
        .await
        .unwrap();

    assert!(publisher.is_empty().await);
}

#[tokio::test]
async fn test_flags_resolve_independently_across_addresses() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let both = service
        .create_address(
            contact_id,
            CreateAddressRequest {
                primary_address: true,
                mail_address: true,
                ..Default::default()
            },
            &context(),
        )
        .await
        .unwrap();
    publisher.clear().await;

    // A different address claims primary only; the old holder keeps mail
    let newcomer = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();

    let addresses = service.find_addresses(contact_id).await.unwrap();
    let stored_both = addresses.iter().find(|a| a.id == both.id).unwrap();
    let stored_new = addresses.iter().find(|a| a.id == newcomer.id).unwrap();

    assert!(!stored_both.primary_address);
    assert!(stored_both.mail_address);
    assert!(stored_new.primary_address);
    assert!(!stored_new.mail_address);
}

#[tokio::test]
async fn test_releasing_flag_leaves_other_addresses_untouched() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let holder = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    publisher.clear().await;

    service
        .patch_address(
            holder.id,
            PatchAddressRequest {
                primary_address: core_kernel::Patch::Value(false),
                ..Default::default()
            },
            &context(),
        )
        .await
        .unwrap();

    let addresses = service.find_addresses(contact_id).await.unwrap();
    assert!(addresses.iter().all(|a| !a.primary_address));

    // Only the target changed, so only the target gets an event
    assert_eq!(publisher.len().await, 1);
}

#[tokio::test]
async fn test_deleted_address_leaves_invariant_and_listings() {
    let (service, publisher, contact_id) = service_with_contact().await;

    let holder = service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    publisher.clear().await;

    service.delete_address(holder.id, &context()).await.unwrap();

    assert!(service.find_addresses(contact_id).await.unwrap().is_empty());
    assert_eq!(
        publisher
            .events_of_kind(OutboundEventKind::ContactAddressDeleted)
            .await
            .len(),
        1
    );

    // A new primary can now be created without displacing anything
    publisher.clear().await;
    service
        .create_address(contact_id, primary_request(), &context())
        .await
        .unwrap();
    assert_eq!(publisher.len().await, 1);

    // Patching the deleted address fails as not-found
    let err = service
        .patch_address(holder.id, PatchAddressRequest::default(), &context())
        .await
        .unwrap_err();
    assert!(matches!(err, domain_contact::ContactError::AddressNotFound(id) if id == holder.id));
}

// The invariant holds under arbitrary sequences of flag claims: after every
// operation at most one address holds each flag.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exclusivity_invariant_holds(
        ops in proptest::collection::vec((0usize..5, any::<bool>(), any::<bool>()), 1..40)
    ) {
        let contact_id = core_kernel::ContactId::new();
        let mut addresses: Vec<ContactAddress> = (0..5)
            .map(|_| ContactAddress::new(contact_id, CreateAddressRequest::default(), "TEST"))
            .collect();

        for (index, want_primary, want_mail) in ops {
            let target = addresses[index].id;
            let changes = plan_flag_changes(&addresses, target, want_primary, want_mail);
            for change in changes {
                let address = addresses
                    .iter_mut()
                    .find(|a| a.id == change.address_id)
                    .unwrap();
                address.primary_address = change.primary_address;
                address.mail_address = change.mail_address;
            }

            let primaries = addresses.iter().filter(|a| a.primary_address).count();
            let mails = addresses.iter().filter(|a| a.mail_address).count();
            prop_assert!(primaries <= 1, "primary flag held by {primaries} addresses");
            prop_assert!(mails <= 1, "mail flag held by {mails} addresses");
        }
    }
}
