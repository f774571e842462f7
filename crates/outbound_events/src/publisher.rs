//! The event publisher port and its local adapters
//!
//! Services call [`EventPublisher::publish`] exactly once per affected row,
//! strictly after the underlying write has committed. Delivery durability is
//! the sink's concern; this core only guarantees the cardinality.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use core_kernel::DomainPort;

use crate::error::PublishError;
use crate::event::{OutboundEvent, OutboundEventKind};

/// Port for emitting outbound domain events
#[async_trait]
pub trait EventPublisher: DomainPort {
    /// Hands one event to the sink
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError>;
}

/// Publisher that writes events to the tracing log
///
/// The default sink for local assemblies and examples; deployed
/// environments use the platform's messaging adapter instead.
#[derive(Debug, Default, Clone)]
pub struct TracingPublisher;

impl DomainPort for TracingPublisher {}

#[async_trait]
impl EventPublisher for TracingPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        info!(
            event_type = event.kind.event_type(),
            entity_id = %event.entity_id,
            username = %event.username,
            "Publishing outbound event"
        );
        Ok(())
    }
}

/// Publisher that captures events in memory for test assertions
#[derive(Debug, Default, Clone)]
pub struct CapturingPublisher {
    events: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl CapturingPublisher {
    /// Creates a new capturing publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events in publication order
    pub async fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().await.clone()
    }

    /// Returns captured events of one kind
    pub async fn events_of_kind(&self, kind: OutboundEventKind) -> Vec<OutboundEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns the number of captured events
    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Returns true if no event has been captured
    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }

    /// Clears the captured events
    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

impl DomainPort for CapturingPublisher {}

#[async_trait]
impl EventPublisher for CapturingPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Publisher that fails every publish, for exercising the post-commit
/// failure path
#[derive(Debug, Default, Clone)]
pub struct FailingPublisher;

impl DomainPort for FailingPublisher {}

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: OutboundEvent) -> Result<(), PublishError> {
        Err(PublishError::SinkUnavailable("sink is down".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PersonReference;
    use core_kernel::{ContactId, RequestContext};

    fn sample_event() -> OutboundEvent {
        let contact_id = ContactId::new();
        OutboundEvent::new(
            OutboundEventKind::ContactCreated,
            &RequestContext::new("OFFICER1"),
            contact_id,
            PersonReference::contact(contact_id),
        )
    }

    #[tokio::test]
    async fn test_capturing_publisher_records_in_order() {
        let publisher = CapturingPublisher::new();

        publisher.publish(sample_event()).await.unwrap();
        publisher.publish(sample_event()).await.unwrap();

        assert_eq!(publisher.len().await, 2);
        let events = publisher.events().await;
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_capturing_publisher_filters_by_kind() {
        let publisher = CapturingPublisher::new();
        publisher.publish(sample_event()).await.unwrap();

        assert_eq!(
            publisher
                .events_of_kind(OutboundEventKind::ContactCreated)
                .await
                .len(),
            1
        );
        assert!(publisher
            .events_of_kind(OutboundEventKind::ContactUpdated)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_failing_publisher_surfaces_sink_fault() {
        let publisher = FailingPublisher;
        let err = publisher.publish(sample_event()).await.unwrap_err();
        assert!(matches!(err, PublishError::SinkUnavailable(_)));
    }

    #[tokio::test]
    async fn test_tracing_publisher_accepts_events() {
        let publisher = TracingPublisher;
        assert!(publisher.publish(sample_event()).await.is_ok());
    }
}
