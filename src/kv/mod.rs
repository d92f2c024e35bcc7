//! Key-value store backing persisted contract state
//!
//! Contracts never touch a store directly: [`crate::snapshot`] maps each
//! contract's state onto primitive keys and back. The trait is async so a
//! persistent backend can be swapped in without changing callers.
//!
//! # Example
//!
//! ```rust
//! use quantum_collab::kv::{KvStore, MemoryKvStore};
//!
//! # async fn example() -> quantum_collab::Result<()> {
//! let store = MemoryKvStore::new();
//!
//! store.set("quantum-token/total-supply", b"100".to_vec()).await?;
//! let value = store.get("quantum-token/total-supply").await?;
//! assert_eq!(value, Some(b"100".to_vec()));
//!
//! store.delete("quantum-token/total-supply").await?;
//! assert!(!store.exists("quantum-token/total-supply").await?);
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::MemoryKvStore;

use crate::Result;
use std::future::Future;

/// Byte-valued key-value store.
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Set a value for a key, overwriting any existing value.
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Delete a key. No-op if absent.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Set several pairs. Backends with native batching should override this.
    fn batch_set(&self, pairs: Vec<(String, Vec<u8>)>) -> impl Future<Output = Result<()>> + Send {
        async move {
            for (key, value) in pairs {
                self.set(&key, value).await?;
            }
            Ok(())
        }
    }
}
