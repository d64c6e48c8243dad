//! Raw key-value backend trait and the in-memory implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageResult;

/// A byte-level key-value store.
///
/// Backends see fully namespaced physical keys; scoping and capability
/// checks happen a layer above in [`ScopedStorage`](crate::ScopedStorage).
/// TTL semantics belong to the backend — an implementation may honor, round,
/// or ignore them.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read a value, `None` if the key is absent.
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Write a value, optionally with a time-to-live.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> StorageResult<()>;

    /// Delete a key. Returns whether it existed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Whether the key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// All keys starting with the prefix, sorted.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory [`KvBackend`] for tests and single-process deployments.
///
/// TTLs are honored lazily: expired entries read as absent and are dropped
/// the next time they are touched. There is no background sweeper.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, StoredValue>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|v| !v.is_expired(now)).count()
    }

    /// Whether the store has no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvBackend for MemoryKvStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(stored) if !stored.is_expired(now) => {
                    return Ok(Some(stored.value.clone()));
                },
                None => return Ok(None),
                Some(_) => {},
            }
        }
        // Drop the expired entry on the slow path.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|v| v.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> StorageResult<()> {
        let expires_at = ttl.and_then(|d| Instant::now().checked_add(d));
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredValue { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(stored) => Ok(!stored.is_expired(now)),
            None => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, stored)| key.starts_with(prefix) && !stored.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryKvStore::new();
        store.set("a", b"1".to_vec(), None).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(b"1".to_vec()));
        assert!(store.exists("a").await.unwrap());
        assert!(store.delete("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
        assert!(!store.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let store = MemoryKvStore::new();
        store.set("ns:b", b"2".to_vec(), None).await.unwrap();
        store.set("ns:a", b"1".to_vec(), None).await.unwrap();
        store.set("other:c", b"3".to_vec(), None).await.unwrap();

        let keys = store.list("ns:").await.unwrap();
        assert_eq!(keys, vec!["ns:a".to_string(), "ns:b".to_string()]);

        let all = store.list("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn ttl_entries_expire() {
        let store = MemoryKvStore::new();
        store
            .set("gone", b"x".to_vec(), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        store.set("kept", b"y".to_vec(), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.get("gone").await.unwrap(), None);
        assert!(!store.exists("gone").await.unwrap());
        assert_eq!(store.list("").await.unwrap(), vec!["kept".to_string()]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let store = MemoryKvStore::new();
        store.set("k", b"old".to_vec(), None).await.unwrap();
        store.set("k", b"new".to_vec(), None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn empty_value_is_not_absent() {
        let store = MemoryKvStore::new();
        store.set("empty", Vec::new(), None).await.unwrap();
        assert_eq!(store.get("empty").await.unwrap(), Some(Vec::new()));
    }
}
