//! Storage backends for persisted collections.
//!
//! A backend is a flat key-value space of named slots, the same shape as the
//! browser's local storage. Each store kind owns one slot.

use crate::error::Result;

#[cfg(feature = "file")]
pub mod file;
pub mod inmemory;

#[cfg(feature = "file")]
pub use file::FileBackend;
pub use inmemory::InMemoryBackend;

/// Trait for storage backend implementations.
///
/// **IMPORTANT:** All methods use `&self` so one backend can be shared by several
/// stores. Implementations use interior mutability or external storage.
///
/// Writes are last-writer-wins; there is no locking around a store's
/// read-modify-write cycle.
pub trait StorageBackend: Send + Sync + Clone {
    /// Read a slot.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Slot present
    /// - `Ok(None)` - Slot never written or deleted
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace a slot's content.
    ///
    /// # Errors
    /// Returns `Err` if the write fails.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a slot exists.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be read.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// List slot names.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;

    /// Verify the backend is usable.
    ///
    /// # Errors
    /// Returns `Err` if the backend is not accessible.
    fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Remove every slot (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if the operation is not implemented or fails.
    fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_exists_default() {
        let backend = InMemoryBackend::new();
        backend
            .set("cart-storage", vec![1, 2, 3])
            .expect("Failed to set slot");
        assert!(backend
            .exists("cart-storage")
            .expect("Failed to check exists"));
        assert!(!backend
            .exists("wishlist-storage")
            .expect("Failed to check exists"));
    }
}
