//! Product comparison store.

use crate::backend::StorageBackend;
use crate::collection::{PersistedCollection, SubscriptionId};
use crate::entry::CompareEntry;
use crate::error::Result;
use crate::observability::{LogNotifier, Notifier};
use crate::outcome::{Outcome, Rejection};
use crate::product::RawProduct;
use std::sync::Arc;

/// Compare list: unique products, bounded size, no eviction.
///
/// A full list refuses new products and tells the shopper through the
/// configured [`Notifier`].
pub struct CompareStore<B: StorageBackend> {
    inner: PersistedCollection<CompareEntry, B>,
    notifier: Arc<dyn Notifier>,
}

impl<B: StorageBackend> CompareStore<B> {
    /// `inner` should carry a capacity; without one the list is unbounded.
    pub fn new(inner: PersistedCollection<CompareEntry, B>) -> Self {
        CompareStore {
            inner,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn add_item(&mut self, product: &RawProduct) -> Result<Outcome> {
        let outcome = self.inner.add(product)?;
        if let Some(rejection @ Rejection::CapacityExceeded { .. }) = outcome.rejection() {
            self.notifier.notify(&rejection);
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn remove_item(&mut self, id: &str) -> Result<Outcome> {
        self.inner.remove(id)
    }

    pub fn is_in_compare(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn clear_compare(&mut self) -> Result<Outcome> {
        self.inner.clear()
    }

    pub fn items(&self) -> &[CompareEntry] {
        self.inner.items()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.capacity().is_some_and(|limit| self.len() >= limit)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[CompareEntry]) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// # Errors
    ///
    /// See [`PersistedCollection::rehydrate`].
    pub fn rehydrate(&mut self) -> Result<usize> {
        self.inner.rehydrate()
    }

    pub fn collection(&self) -> &PersistedCollection<CompareEntry, B> {
        &self.inner
    }
}
