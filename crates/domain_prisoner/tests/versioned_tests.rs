//! Tests for the versioned singleton attributes

use std::sync::Arc;

use core_kernel::{PrisonerNumber, RequestContext};
use domain_prisoner::{
    InMemoryVersionedStore, MockPrisonerDirectory, PrisonerError, PrisonerProfileService,
};
use domain_reference::{InMemoryReferenceData, ReferenceError};
use outbound_events::{CapturingPublisher, OutboundEventKind};

fn prisoner() -> PrisonerNumber {
    PrisonerNumber::new("A1234BC").unwrap()
}

fn context() -> RequestContext {
    RequestContext::new("OFFICER1")
}

async fn build_service() -> (PrisonerProfileService, CapturingPublisher) {
    let directory = MockPrisonerDirectory::with_prisoners(vec![prisoner()]).await;
    let publisher = CapturingPublisher::new();
    let service = PrisonerProfileService::new(
        Arc::new(directory),
        Arc::new(InMemoryVersionedStore::<String>::new()),
        Arc::new(InMemoryVersionedStore::<u32>::new()),
        Arc::new(InMemoryReferenceData::new()),
        Arc::new(publisher.clone()),
    );
    (service, publisher)
}

#[tokio::test]
async fn test_superseding_value_with_null_keeps_history() {
    let (service, _) = build_service().await;

    let married = service
        .set_domestic_status(prisoner(), Some("M".to_string()), &context())
        .await
        .unwrap();
    let cleared = service
        .set_domestic_status(prisoner(), None, &context())
        .await
        .unwrap();

    // Current is the null row, with a newer sequence than the "M" row
    let current = service.current_domestic_status(&prisoner()).await.unwrap();
    assert!(current.value.is_none());
    assert!(current.seq > married.seq);
    assert_eq!(current.seq, cleared.seq);

    // The "M" row still exists
    let history = service.domestic_status_history(&prisoner()).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value.as_deref(), Some("M"));
    assert!(history[1].value.is_none());
}

#[tokio::test]
async fn test_no_record_is_distinct_from_null_value() {
    let (service, _) = build_service().await;

    // No row at all: not found
    let err = service
        .current_domestic_status(&prisoner())
        .await
        .unwrap_err();
    assert!(matches!(err, PrisonerError::NoRecord { attribute, .. } if attribute == "domestic status"));

    // A null row: found, with a null value
    service
        .set_domestic_status(prisoner(), None, &context())
        .await
        .unwrap();
    let current = service.current_domestic_status(&prisoner()).await.unwrap();
    assert!(current.value.is_none());
}

#[tokio::test]
async fn test_every_insert_emits_a_creation_event() {
    let (service, publisher) = build_service().await;

    service
        .set_domestic_status(prisoner(), Some("M".to_string()), &context())
        .await
        .unwrap();
    service
        .set_domestic_status(prisoner(), Some("D".to_string()), &context())
        .await
        .unwrap();

    // Superseding emits another creation event, never an update
    let events = publisher
        .events_of_kind(OutboundEventKind::DomesticStatusCreated)
        .await;
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| e.person_reference.prisoner_number == Some(prisoner())));
    assert_eq!(publisher.len().await, 2);
}

#[tokio::test]
async fn test_unsupported_code_inserts_nothing() {
    let (service, publisher) = build_service().await;

    let err = service
        .set_domestic_status(prisoner(), Some("BOGUS".to_string()), &context())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PrisonerError::Reference(ReferenceError::UnsupportedCode { .. })
    ));

    assert!(publisher.is_empty().await);
    assert!(service
        .domestic_status_history(&prisoner())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unknown_prisoner_is_rejected_before_write() {
    let (service, publisher) = build_service().await;
    let stranger = PrisonerNumber::new("Z9999ZZ").unwrap();

    let err = service
        .set_domestic_status(stranger.clone(), Some("M".to_string()), &context())
        .await
        .unwrap_err();
    assert!(matches!(err, PrisonerError::PrisonerNotFound(ref p) if *p == stranger));
    assert!(publisher.is_empty().await);
}

#[tokio::test]
async fn test_number_of_children_bound() {
    let (service, publisher) = build_service().await;

    let err = service
        .set_number_of_children(prisoner(), Some(100), &context())
        .await
        .unwrap_err();
    assert!(matches!(err, PrisonerError::Constraint(_)));
    assert!(publisher.is_empty().await);

    service
        .set_number_of_children(prisoner(), Some(3), &context())
        .await
        .unwrap();
    let current = service
        .current_number_of_children(&prisoner())
        .await
        .unwrap();
    assert_eq!(current.value, Some(3));
    assert_eq!(
        publisher
            .events_of_kind(OutboundEventKind::NumberOfChildrenCreated)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn test_attributes_are_independent_chains() {
    let (service, _) = build_service().await;

    service
        .set_domestic_status(prisoner(), Some("M".to_string()), &context())
        .await
        .unwrap();
    service
        .set_number_of_children(prisoner(), Some(2), &context())
        .await
        .unwrap();
    service
        .set_domestic_status(prisoner(), Some("D".to_string()), &context())
        .await
        .unwrap();

    assert_eq!(
        service
            .domestic_status_history(&prisoner())
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        service
            .number_of_children_history(&prisoner())
            .await
            .unwrap()
            .len(),
        1
    );
}
