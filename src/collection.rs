//! Generic persisted collection - the skeleton shared by cart, wishlist and compare.
//!
//! Holds an ordered list of entries in memory and mirrors it to one storage
//! slot. Every mutator runs to completion synchronously: guard checks, the
//! in-memory change, listener notification and the write-through.

use crate::backend::StorageBackend;
use crate::entry::CollectionEntry;
use crate::error::Result;
use crate::migration::MigrationChain;
use crate::observability::{NoOpMetrics, StoreMetrics};
use crate::outcome::{Outcome, Rejection};
use crate::product::{ProductId, RawProduct};
use crate::serialization::{decode_slot, encode_slot};
use std::sync::Arc;
use std::time::Instant;

/// Handle returned by [`PersistedCollection::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn Fn(&[E]) + Send + Sync>;

/// Ordered, persisted collection of unique entries.
///
/// # Example
///
/// ```
/// use haven_store::backend::InMemoryBackend;
/// use haven_store::collection::PersistedCollection;
/// use haven_store::entry::WishlistEntry;
/// use haven_store::{Outcome, RawProduct};
///
/// # fn main() -> haven_store::Result<()> {
/// let mut saved: PersistedCollection<WishlistEntry, _> =
///     PersistedCollection::new(InMemoryBackend::new(), "saved-storage").hydrate();
///
/// assert_eq!(saved.add(&RawProduct::new("sku-1"))?, Outcome::Added);
/// assert_eq!(saved.add(&RawProduct::new("sku-1"))?, Outcome::Unchanged);
/// assert_eq!(saved.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct PersistedCollection<E: CollectionEntry, B: StorageBackend> {
    backend: B,
    slot: String,
    items: Vec<E>,
    capacity: Option<usize>,
    persist: bool,
    migrations: MigrationChain,
    metrics: Arc<dyn StoreMetrics>,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_subscription: u64,
}

impl<E: CollectionEntry, B: StorageBackend> PersistedCollection<E, B> {
    /// Create an empty collection bound to `slot`. Nothing is read until
    /// [`hydrate`](Self::hydrate) or [`rehydrate`](Self::rehydrate).
    pub fn new(backend: B, slot: impl Into<String>) -> Self {
        PersistedCollection {
            backend,
            slot: slot.into(),
            items: Vec::new(),
            capacity: None,
            persist: true,
            migrations: MigrationChain::standard(),
            metrics: Arc::new(NoOpMetrics),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Limit the number of entries.
    pub fn with_capacity(mut self, limit: usize) -> Self {
        self.capacity = Some(limit);
        self
    }

    pub fn with_migrations(mut self, migrations: MigrationChain) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Disable write-through. Hydration still reads the slot.
    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persist = enabled;
        self
    }

    /// Load the slot, logging instead of failing.
    ///
    /// A missing, corrupt or too-new slot leaves the collection empty. The slot
    /// is not rewritten until the next mutation.
    pub fn hydrate(mut self) -> Self {
        if let Err(e) = self.rehydrate() {
            warn!("Starting {} empty: {}", self.slot, e);
            self.metrics.record_error(&self.slot, &e.to_string());
        }
        self
    }

    /// Re-read the slot and replace the in-memory entries.
    ///
    /// Picks up writes made by other instances sharing the backend. Returns the
    /// number of entries restored. Listeners are notified on success.
    ///
    /// # Errors
    ///
    /// - `Error::BackendError`: the slot could not be read
    /// - `Error::InvalidSlot`: the slot is not a collection document
    /// - `Error::VersionMismatch` / `Error::MigrationGap`: the slot cannot be
    ///   upgraded to the current schema
    ///
    /// On error the in-memory entries are left as they were.
    pub fn rehydrate(&mut self) -> Result<usize> {
        let items = match self.backend.get(&self.slot)? {
            Some(bytes) => decode_slot::<E>(&bytes, &self.migrations)?.items,
            None => Vec::new(),
        };

        let items = match self.capacity {
            Some(limit) if items.len() > limit => {
                debug!(
                    "Truncating {} from {} to {} entries",
                    self.slot,
                    items.len(),
                    limit
                );
                items.into_iter().take(limit).collect()
            }
            _ => items,
        };

        debug!("✓ Hydrated {} with {} entries", self.slot, items.len());
        self.items = items;
        self.notify();
        Ok(self.items.len())
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Add a product, or let the entry type merge it when already present.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails; the in-memory change
    /// has already been applied by then.
    pub fn add(&mut self, product: &RawProduct) -> Result<Outcome> {
        let Some(snapshot) = product.snapshot() else {
            warn!(
                "Refusing to add product without id to {}: {:?}",
                self.slot, product.name
            );
            return Ok(self.reject(Rejection::MissingIdentifier));
        };

        if let Some(existing) = self.items.iter_mut().find(|e| *e.id() == snapshot.id) {
            let outcome = existing.merge_duplicate();
            if outcome.is_applied() {
                self.metrics.record_added(&self.slot, snapshot.id.as_str());
                self.commit()?;
            }
            return Ok(outcome);
        }

        if let Some(limit) = self.capacity {
            if self.items.len() >= limit {
                return Ok(self.reject(Rejection::CapacityExceeded { limit }));
            }
        }

        self.metrics.record_added(&self.slot, snapshot.id.as_str());
        self.items.push(E::from_product(snapshot));
        self.commit()?;
        Ok(Outcome::Added)
    }

    /// Remove the entry with this identifier.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn remove(&mut self, id: &str) -> Result<Outcome> {
        let Some(id) = ProductId::parse(id) else {
            warn!("Refusing to remove blank id from {}", self.slot);
            return Ok(self.reject(Rejection::InvalidKey));
        };

        let before = self.items.len();
        self.items.retain(|e| *e.id() != id);
        if self.items.len() == before {
            return Ok(Outcome::Unchanged);
        }

        self.metrics.record_removed(&self.slot, id.as_str());
        self.commit()?;
        Ok(Outcome::Removed)
    }

    /// Empty the collection. Always succeeds as a state change.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn clear(&mut self) -> Result<Outcome> {
        self.items.clear();
        debug!("Cleared {}", self.slot);
        self.commit()?;
        Ok(Outcome::Cleared)
    }

    /// Apply `f` to the entry with this identifier.
    ///
    /// Returns `Outcome::Unchanged` when no entry matches, `InvalidKey` for a
    /// blank identifier.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<Outcome>
    where
        F: FnOnce(&mut E) -> Outcome,
    {
        let Some(id) = ProductId::parse(id) else {
            warn!("Refusing to update blank id in {}", self.slot);
            return Ok(self.reject(Rejection::InvalidKey));
        };

        let Some(entry) = self.items.iter_mut().find(|e| *e.id() == id) else {
            return Ok(Outcome::Unchanged);
        };

        let outcome = f(entry);
        if outcome.is_applied() {
            self.commit()?;
        }
        Ok(outcome)
    }

    /// Record a rejection and hand it back to the caller.
    pub(crate) fn reject(&self, rejection: Rejection) -> Outcome {
        self.metrics.record_rejected(&self.slot, &rejection);
        Outcome::Rejected(rejection)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id().as_str() == id)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Register a listener called with the entry list after every applied
    /// mutation and every successful rehydrate.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[E]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` when the listener was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Write the current entries to the slot.
    ///
    /// # Errors
    ///
    /// - `Error::SerializationError`: an entry failed to encode
    /// - `Error::BackendError`: the write failed
    pub fn persist(&self) -> Result<()> {
        if !self.persist {
            return Ok(());
        }

        let timer = Instant::now();
        let result = encode_slot(&self.items).and_then(|bytes| self.backend.set(&self.slot, bytes));

        match &result {
            Ok(()) => {
                self.metrics
                    .record_persisted(&self.slot, self.items.len(), timer.elapsed());
            }
            Err(e) => {
                error!("Failed to persist {}: {}", self.slot, e);
                self.metrics.record_error(&self.slot, &e.to_string());
            }
        }
        result
    }

    fn commit(&mut self) -> Result<()> {
        self.notify();
        self.persist()
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::entry::{CartEntry, WishlistEntry};
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend whose writes always fail.
    #[derive(Clone, Default)]
    struct FailingBackend;

    impl StorageBackend for FailingBackend {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
            Err(Error::BackendError("quota exceeded".to_string()))
        }
        fn delete(&self, _key: &str) -> Result<()> {
            Ok(())
        }
        fn keys(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn wishlist() -> PersistedCollection<WishlistEntry, InMemoryBackend> {
        PersistedCollection::new(InMemoryBackend::new(), "wishlist-storage").hydrate()
    }

    #[test]
    fn test_add_then_remove() {
        let mut c = wishlist();
        assert_eq!(c.add(&RawProduct::new("sku-1")).unwrap(), Outcome::Added);
        assert!(c.contains("sku-1"));
        assert_eq!(c.remove("sku-1").unwrap(), Outcome::Removed);
        assert!(c.is_empty());
    }

    #[test]
    fn test_add_without_identifier_is_rejected() {
        let mut c = wishlist();
        let outcome = c
            .add(&RawProduct::default().with_name("Mystery Drum"))
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected(Rejection::MissingIdentifier));
        assert!(c.is_empty());
        assert!(!c.backend().exists("wishlist-storage").unwrap());
    }

    #[test]
    fn test_remove_blank_key_is_rejected() {
        let mut c = wishlist();
        c.add(&RawProduct::new("sku-1")).unwrap();
        assert_eq!(
            c.remove("").unwrap(),
            Outcome::Rejected(Rejection::InvalidKey)
        );
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_unchanged() {
        let mut c = wishlist();
        assert_eq!(c.remove("sku-404").unwrap(), Outcome::Unchanged);
    }

    #[test]
    fn test_capacity_rejects_new_but_not_duplicate() {
        let mut c = PersistedCollection::<WishlistEntry, _>::new(InMemoryBackend::new(), "s")
            .with_capacity(1)
            .hydrate();
        c.add(&RawProduct::new("sku-1")).unwrap();

        assert_eq!(c.add(&RawProduct::new("sku-1")).unwrap(), Outcome::Unchanged);
        assert_eq!(
            c.add(&RawProduct::new("sku-2")).unwrap(),
            Outcome::Rejected(Rejection::CapacityExceeded { limit: 1 })
        );
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_mutations_write_through() {
        let backend = InMemoryBackend::new();
        let mut c: PersistedCollection<CartEntry, _> =
            PersistedCollection::new(backend.clone(), "cart-storage").hydrate();
        c.add(&RawProduct::new("sku-1")).unwrap();
        c.add(&RawProduct::new("sku-1")).unwrap();

        let reopened: PersistedCollection<CartEntry, _> =
            PersistedCollection::new(backend, "cart-storage").hydrate();
        assert_eq!(reopened.items(), c.items());
        assert_eq!(reopened.items()[0].quantity, 2);
    }

    #[test]
    fn test_persistence_disabled_never_writes() {
        let backend = InMemoryBackend::new();
        let mut c: PersistedCollection<WishlistEntry, _> =
            PersistedCollection::new(backend.clone(), "wishlist-storage")
                .with_persistence(false)
                .hydrate();
        c.add(&RawProduct::new("sku-1")).unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_listeners_notified_on_applied_mutations_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut c = wishlist();
        let counter = Arc::clone(&calls);
        let sub = c.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        c.add(&RawProduct::new("sku-1")).unwrap();
        c.add(&RawProduct::new("sku-1")).unwrap();
        c.remove("").unwrap();
        c.remove("sku-1").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(c.unsubscribe(sub));
        c.clear().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!c.unsubscribe(sub));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut c: PersistedCollection<WishlistEntry, _> =
            PersistedCollection::new(FailingBackend, "wishlist-storage").hydrate();

        let result = c.add(&RawProduct::new("sku-1"));
        assert!(matches!(result, Err(Error::BackendError(_))));
        assert!(c.contains("sku-1"));
    }

    #[test]
    fn test_corrupt_slot_opens_empty_and_keeps_slot() {
        let backend = InMemoryBackend::new();
        backend
            .set("wishlist-storage", b"not json".to_vec())
            .unwrap();

        let c: PersistedCollection<WishlistEntry, _> =
            PersistedCollection::new(backend.clone(), "wishlist-storage").hydrate();
        assert!(c.is_empty());
        assert_eq!(
            backend.get("wishlist-storage").unwrap(),
            Some(b"not json".to_vec())
        );
    }

    #[test]
    fn test_rehydrate_error_leaves_state() {
        let backend = InMemoryBackend::new();
        let mut c: PersistedCollection<WishlistEntry, _> =
            PersistedCollection::new(backend.clone(), "wishlist-storage").hydrate();
        c.add(&RawProduct::new("sku-1")).unwrap();

        backend
            .set(
                "wishlist-storage",
                br#"{"state":{"items":[]},"version":99}"#.to_vec(),
            )
            .unwrap();
        assert!(matches!(
            c.rehydrate(),
            Err(Error::VersionMismatch { found: 99, .. })
        ));
        assert!(c.contains("sku-1"));
    }
}
