//! Storage error types.

use orbita_capabilities::CapabilityError;

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested key does not exist.
    ///
    /// Returned instead of an empty value so callers can distinguish
    /// "absent" from "stored empty".
    #[error("storage key not found: {0}")]
    KeyNotFound(String),

    /// The logical key exceeds the maximum length.
    #[error("storage key too long: {len} bytes (limit {limit})")]
    KeyTooLong {
        /// Actual key length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        limit: usize,
    },

    /// The value exceeds the maximum size.
    #[error("storage value too big: {len} bytes (limit {limit})")]
    ValueTooBig {
        /// Actual value size in bytes.
        len: usize,
        /// Maximum allowed size in bytes.
        limit: usize,
    },

    /// The backing store failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The caller lacks the required storage capability.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
