//! Sandbox error types.

use orbita_capabilities::CapabilityError;
use orbita_core::QueryError;

/// Errors from sandboxed API calls.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The caller lacks the capability gating the API.
    ///
    /// Sandboxed APIs fail fast with this rather than returning empty data,
    /// so orbit authors can tell "no data" from "not permitted".
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The host query handler failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type for sandboxed API calls.
pub type SandboxResult<T> = Result<T, SandboxError>;
