//! Orbit error types.
//!
//! Sentinel-style: callers match on the variant, never on message text.

use std::path::PathBuf;

use orbita_capabilities::CapabilityError;
use orbita_core::OrbitId;

/// Errors from orbit lifecycle, manifest, and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum OrbitError {
    /// The requested orbit is not in the registry.
    #[error("orbit not found: {0}")]
    NotFound(OrbitId),

    /// An orbit with this id is already registered.
    #[error("orbit already loaded: {0}")]
    AlreadyLoaded(OrbitId),

    /// The user's plan does not include this orbit's entitlement.
    #[error("orbit {orbit_id} requires entitlement: {entitlement}")]
    NotEntitled {
        /// The gated orbit.
        orbit_id: OrbitId,
        /// The entitlement the manifest declares.
        entitlement: String,
    },

    /// The orbit cannot serve instances (no factory, or already shut down).
    #[error("orbit not initialized: {0}")]
    NotInitialized(OrbitId),

    /// The orbit's factory failed. Cached on the entry and returned to
    /// every subsequent lookup until the entry is re-registered.
    #[error("orbit load failed: {orbit_id}: {message}")]
    LoadFailed {
        /// The orbit whose factory failed.
        orbit_id: OrbitId,
        /// Rendered factory error.
        message: String,
    },

    /// No manifest file at the given path.
    #[error("manifest not found: {}", path.display())]
    ManifestNotFound {
        /// The missing manifest path.
        path: PathBuf,
    },

    /// The manifest failed to decode or validate.
    #[error("invalid manifest: {message}")]
    ManifestInvalid {
        /// What was wrong.
        message: String,
    },

    /// The manifest has an empty `id` field.
    #[error("manifest is missing an id")]
    ManifestMissingId,

    /// The manifest has an empty or missing `type` field.
    #[error("manifest is missing type \"orbit\"")]
    ManifestMissingType,

    /// The entitlement checker itself failed.
    #[error("entitlement check failed: {0}")]
    EntitlementCheck(String),

    /// A capability error (invalid token, missing grant, or mismatch).
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// I/O failure while reading or writing a manifest.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An orbit implementation reported a failure of its own.
    #[error("orbit error: {0}")]
    Internal(String),
}

/// Result type for orbit operations.
pub type OrbitResult<T> = Result<T, OrbitError>;
