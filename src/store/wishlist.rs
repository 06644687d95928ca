//! Wishlist store.

use crate::backend::StorageBackend;
use crate::collection::{PersistedCollection, SubscriptionId};
use crate::entry::WishlistEntry;
use crate::error::Result;
use crate::outcome::{Outcome, Rejection};
use crate::product::{resolve_identifier, RawProduct};

/// Wishlist: unique saved products, no quantity.
pub struct WishlistStore<B: StorageBackend> {
    inner: PersistedCollection<WishlistEntry, B>,
}

impl<B: StorageBackend> WishlistStore<B> {
    pub fn new(inner: PersistedCollection<WishlistEntry, B>) -> Self {
        WishlistStore { inner }
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn add_item(&mut self, product: &RawProduct) -> Result<Outcome> {
        self.inner.add(product)
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn remove_item(&mut self, id: &str) -> Result<Outcome> {
        self.inner.remove(id)
    }

    /// Remove the product if saved, save it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn toggle_item(&mut self, product: &RawProduct) -> Result<Outcome> {
        let Some(id) = resolve_identifier(product) else {
            warn!("Refusing to toggle product without id: {:?}", product.name);
            return Ok(self.inner.reject(Rejection::MissingIdentifier));
        };

        if self.inner.contains(id.as_str()) {
            self.inner.remove(id.as_str())
        } else {
            self.inner.add(product)
        }
    }

    pub fn is_in_wishlist(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn clear_wishlist(&mut self) -> Result<Outcome> {
        self.inner.clear()
    }

    pub fn items(&self) -> &[WishlistEntry] {
        self.inner.items()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[WishlistEntry]) + Send + Sync + 'static,
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

    pub fn collection(&self) -> &PersistedCollection<WishlistEntry, B> {
        &self.inner
    }
}
