//! Capability error types.

use orbita_core::OrbitId;

use crate::capability::Capability;

/// Errors from capability operations.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// One or more tokens are not in the closed capability set.
    #[error("invalid capabilities: {}", tokens.join(", "))]
    InvalidCapability {
        /// Every offending token, in input order.
        tokens: Vec<String>,
    },

    /// A runtime check found the capability missing from the grant set.
    #[error("capability not granted: {capability}")]
    NotGranted {
        /// The capability the caller lacked.
        capability: Capability,
    },

    /// An orbit requires capabilities its manifest does not declare.
    #[error("orbit {orbit_id} requires undeclared capabilities: {}", missing.iter().map(Capability::as_str).collect::<Vec<_>>().join(", "))]
    Mismatch {
        /// The inconsistent orbit.
        orbit_id: OrbitId,
        /// Required capabilities absent from the manifest.
        missing: Vec<Capability>,
    },
}

/// Result type for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
