//! Outbound Domain Events
//!
//! Every successful mutation in the system emits exactly one event per
//! affected row, after the write has committed. This crate defines the
//! event shapes, the publisher port, and local adapters (tracing-backed,
//! capturing, failing) for assemblies and tests.

pub mod error;
pub mod event;
pub mod publisher;

pub use error::PublishError;
pub use event::{OutboundEvent, OutboundEventKind, PersonReference};
pub use publisher::{CapturingPublisher, EventPublisher, FailingPublisher, TracingPublisher};
