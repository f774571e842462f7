//! Event publishing errors

use thiserror::Error;

use core_kernel::ErrorCategory;

/// Errors raised by the event sink
///
/// The sink is an external collaborator. A publish failure happens after
/// the write has committed; the core surfaces it to the caller rather than
/// masking it or undoing the write.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event sink could not be reached
    #[error("Event sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The sink rejected the event
    #[error("Event rejected by sink: {0}")]
    Rejected(String),
}

impl PublishError {
    /// Returns the outward-facing category for this error
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Internal
    }
}
