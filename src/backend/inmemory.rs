//! In-memory storage backend (default, thread-safe).
//!
//! Uses DashMap for concurrent access with per-key sharding. Clones share the
//! same map, so two stores opened on clones of one backend see each other's
//! writes the way two tabs share one browser profile.

use super::StorageBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory storage backend.
///
/// # Example
///
/// ```
/// use haven_store::backend::{InMemoryBackend, StorageBackend};
///
/// # fn main() -> haven_store::Result<()> {
/// let backend = InMemoryBackend::new();
/// backend.set("cart-storage", br#"{"state":{"items":[]},"version":1}"#.to_vec())?;
///
/// let shared = backend.clone();
/// assert!(shared.get("cart-storage")?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    slots: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new, empty in-memory backend.
    pub fn new() -> Self {
        InMemoryBackend {
            slots: Arc::new(DashMap::new()),
        }
    }

    /// Number of slots currently stored.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.slots.get(key).map(|slot| slot.value().clone());
        debug!(
            "✓ InMemory GET {} -> {}",
            key,
            if value.is_some() { "HIT" } else { "MISS" }
        );
        Ok(value)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        debug!("✓ InMemory SET {} ({} bytes)", key, value.len());
        self.slots.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.slots.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.slots.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.slots.iter().map(|slot| slot.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    fn clear_all(&self) -> Result<()> {
        self.slots.clear();
        warn!("⚠ InMemory CLEAR_ALL executed - all slots cleared!");
        Ok(())
    }
}
