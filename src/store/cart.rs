//! Shopping cart store.

use crate::backend::StorageBackend;
use crate::collection::{PersistedCollection, SubscriptionId};
use crate::entry::CartEntry;
use crate::error::Result;
use crate::outcome::{Outcome, Rejection};
use crate::product::{ProductId, RawProduct};
use rust_decimal::Decimal;

/// Cart: unique lines with a quantity of at least one.
pub struct CartStore<B: StorageBackend> {
    inner: PersistedCollection<CartEntry, B>,
}

impl<B: StorageBackend> CartStore<B> {
    pub fn new(inner: PersistedCollection<CartEntry, B>) -> Self {
        CartStore { inner }
    }

    /// Add one unit. A product already in the cart has its quantity raised by one.
    ///
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

    /// Set the quantity of a line. Zero or less removes the line.
    ///
    /// Returns `Outcome::Unchanged` when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<Outcome> {
        if ProductId::parse(id).is_none() {
            warn!("Refusing to update quantity for blank id");
            return Ok(self.inner.reject(Rejection::InvalidKey));
        }

        if quantity <= 0 {
            return self.inner.remove(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.inner.update(id, |entry| {
            if entry.quantity == quantity {
                Outcome::Unchanged
            } else {
                entry.quantity = quantity;
                Outcome::QuantityChanged { quantity }
            }
        })
    }

    /// # Errors
    ///
    /// Returns `Err` only when the write-through fails.
    pub fn clear_cart(&mut self) -> Result<Outcome> {
        self.inner.clear()
    }

    pub fn items(&self) -> &[CartEntry] {
        self.inner.items()
    }

    pub fn get(&self, id: &str) -> Option<&CartEntry> {
        self.inner.get(id)
    }

    pub fn quantity_of(&self, id: &str) -> u32 {
        self.inner.get(id).map_or(0, |e| e.quantity)
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.inner.items().iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of unit price times quantity over all lines, saturating instead of
    /// overflowing.
    pub fn total_price(&self) -> Decimal {
        self.inner
            .items()
            .iter()
            .map(CartEntry::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[CartEntry]) + Send + Sync + 'static,
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

    pub fn collection(&self) -> &PersistedCollection<CartEntry, B> {
        &self.inner
    }
}
