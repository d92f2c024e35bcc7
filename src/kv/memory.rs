//! In-memory KV store implementation using `DashMap`.
//!
//! Data is lost on process restart.

use super::KvStore;
use crate::Result;
use dashmap::DashMap;

/// In-memory key-value store using a lock-free concurrent hashmap.
///
/// # Example
///
/// ```rust
/// use quantum_collab::kv::{KvStore, MemoryKvStore};
///
/// # async fn example() -> quantum_collab::Result<()> {
/// let store = MemoryKvStore::new();
/// store.set("quantum-token/owner", b"\"ST1OWNER\"".to_vec()).await?;
/// assert!(store.exists("quantum-token/owner").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    store: DashMap<String, Vec<u8>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// All keys starting with `prefix`, sorted.
    #[must_use]
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Synchronous insert, for seeding fixtures.
    pub fn insert_sync(&self, key: impl Into<String>, value: Vec<u8>) {
        self.store.insert(key.into(), value);
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }
}
