//! Event error types.

use orbita_capabilities::CapabilityError;

/// Errors from event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The event type string is empty.
    #[error("event type must not be empty")]
    InvalidEventType,

    /// A subscribed handler failed.
    ///
    /// Dispatch never surfaces this — handler failures are logged and
    /// swallowed so one misbehaving subscriber cannot suppress delivery.
    /// Handlers return it to describe their own failures.
    #[error("event handler failed: {0}")]
    HandlerFailed(String),

    /// Forwarding to the host publisher failed.
    #[error("event publish failed: {0}")]
    Publish(String),

    /// The caller lacks the required events capability.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;
