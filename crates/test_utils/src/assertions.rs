//! Assertion Helpers
//!
//! Event-cardinality assertions used across the suite. The one-event-per-
//! mutation-per-affected-row contract is asserted so often that the helpers
//! here keep failure messages uniform.

use outbound_events::{CapturingPublisher, OutboundEventKind};

/// Asserts the publisher captured exactly `expected` events of `kind`
pub async fn assert_event_count(
    publisher: &CapturingPublisher,
    kind: OutboundEventKind,
    expected: usize,
) {
    let actual = publisher.events_of_kind(kind).await.len();
    assert_eq!(
        actual, expected,
        "expected {expected} {kind:?} events, captured {actual}"
    );
}

/// Asserts the publisher captured exactly one event of `kind` for the
/// given entity id
pub async fn assert_single_event_for(
    publisher: &CapturingPublisher,
    kind: OutboundEventKind,
    entity_id: impl ToString,
) {
    let entity_id = entity_id.to_string();
    let matching = publisher
        .events_of_kind(kind)
        .await
        .into_iter()
        .filter(|e| e.entity_id == entity_id)
        .count();
    assert_eq!(
        matching, 1,
        "expected exactly one {kind:?} event for {entity_id}, captured {matching}"
    );
}

/// Asserts no events at all were captured
pub async fn assert_no_events(publisher: &CapturingPublisher) {
    let events = publisher.events().await;
    assert!(
        events.is_empty(),
        "expected no events, captured {:?}",
        events.iter().map(|e| e.kind).collect::<Vec<_>>()
    );
}

/// Asserts the total number of captured events
pub async fn assert_total_events(publisher: &CapturingPublisher, expected: usize) {
    let actual = publisher.len().await;
    assert_eq!(
        actual,
        expected,
        "expected {expected} events in total, captured {actual}: {:?}",
        publisher
            .events()
            .await
            .iter()
            .map(|e| e.kind)
            .collect::<Vec<_>>()
    );
}
