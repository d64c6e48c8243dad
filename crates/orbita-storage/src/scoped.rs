//! Orbit-facing scoped storage.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{OrbitId, UserId};

use crate::backend::KvBackend;
use crate::error::{StorageError, StorageResult};

/// Maximum logical key length in bytes.
pub const MAX_KEY_LEN: usize = 256;

/// Maximum value size in bytes (1 MiB).
pub const MAX_VALUE_LEN: usize = 1024 * 1024;

/// A storage view bound to one `(orbit, user)` pair.
///
/// Keys are stored under `orbit:{orbit_id}:user:{user_id}:{key}` and the
/// namespace is stripped back off on the way out, so listing with an empty
/// prefix still only ever shows this orbit's keys for this user. Reads
/// require `read:storage`, mutations require `write:storage`; the two are
/// granted independently so read-only storage is expressible.
#[derive(Clone)]
pub struct ScopedStorage {
    orbit_id: OrbitId,
    user_id: UserId,
    capabilities: CapabilitySet,
    backend: Arc<dyn KvBackend>,
}

impl ScopedStorage {
    /// Bind a storage view to an orbit, a user, and their grant set.
    #[must_use]
    pub fn new(
        orbit_id: OrbitId,
        user_id: UserId,
        capabilities: CapabilitySet,
        backend: Arc<dyn KvBackend>,
    ) -> Self {
        Self {
            orbit_id,
            user_id,
            capabilities,
            backend,
        }
    }

    /// The namespace prefix all physical keys carry.
    #[must_use]
    pub fn namespace(&self) -> String {
        format!("orbit:{}:user:{}:", self.orbit_id, self.user_id)
    }

    fn physical_key(&self, key: &str) -> StorageResult<String> {
        if key.len() > MAX_KEY_LEN {
            return Err(StorageError::KeyTooLong {
                len: key.len(),
                limit: MAX_KEY_LEN,
            });
        }
        Ok(format!("{}{key}", self.namespace()))
    }

    /// Read a value.
    ///
    /// # Errors
    ///
    /// `read:storage` missing, key over limit, [`StorageError::KeyNotFound`]
    /// when the key is absent, or a backend failure.
    pub async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.capabilities.require(Capability::ReadStorage)?;
        let physical = self.physical_key(key)?;
        self.backend
            .get(&physical)
            .await?
            .ok_or_else(|| StorageError::KeyNotFound(key.to_string()))
    }

    /// Write a value, optionally with a time-to-live.
    ///
    /// TTL interpretation is delegated to the backend.
    ///
    /// # Errors
    ///
    /// `write:storage` missing, key or value over limit, or a backend
    /// failure.
    pub async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> StorageResult<()> {
        self.capabilities.require(Capability::WriteStorage)?;
        if value.len() > MAX_VALUE_LEN {
            return Err(StorageError::ValueTooBig {
                len: value.len(),
                limit: MAX_VALUE_LEN,
            });
        }
        let physical = self.physical_key(key)?;
        debug!(orbit_id = %self.orbit_id, key, bytes = value.len(), "Storage write");
        self.backend.set(&physical, value, ttl).await
    }

    /// Delete a key. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// `write:storage` missing, key over limit, or a backend failure.
    pub async fn delete(&self, key: &str) -> StorageResult<bool> {
        self.capabilities.require(Capability::WriteStorage)?;
        let physical = self.physical_key(key)?;
        self.backend.delete(&physical).await
    }

    /// Whether the key exists.
    ///
    /// # Errors
    ///
    /// `read:storage` missing, key over limit, or a backend failure.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.capabilities.require(Capability::ReadStorage)?;
        let physical = self.physical_key(key)?;
        self.backend.exists(&physical).await
    }

    /// List logical keys starting with the prefix, namespace stripped.
    ///
    /// # Errors
    ///
    /// `read:storage` missing, prefix over limit, or a backend failure.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.capabilities.require(Capability::ReadStorage)?;
        let namespace = self.namespace();
        let physical_prefix = self.physical_key(prefix)?;
        let keys = self.backend.list(&physical_prefix).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(&namespace).map(ToString::to_string))
            .collect())
    }
}

impl std::fmt::Debug for ScopedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedStorage")
            .field("orbit_id", &self.orbit_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
