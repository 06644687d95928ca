//! Shopping state container handed to UI code.
//!
//! Builds the cart, wishlist and compare stores over one backend and one
//! configuration. It is an ordinary value: create as many as needed, one per
//! session or per test.

use crate::backend::StorageBackend;
use crate::collection::PersistedCollection;
use crate::config::StoreConfig;
use crate::entry::{CartEntry, CompareEntry, WishlistEntry};
use crate::error::Result;
use crate::key::StoreKind;
use crate::observability::{LogNotifier, NoOpMetrics, Notifier, StoreMetrics};
use crate::store::{CartStore, CompareStore, WishlistStore};
use std::sync::Arc;

/// Cart, wishlist and compare stores sharing one backend.
///
/// # Example
///
/// ```
/// use haven_store::{backend::InMemoryBackend, RawProduct, ShoppingState, StoreConfig};
///
/// # fn main() -> haven_store::Result<()> {
/// let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default())?;
///
/// state.cart.add_item(&RawProduct::new("sku-1"))?;
/// state.wishlist.toggle_item(&RawProduct::new("sku-2"))?;
///
/// assert_eq!(state.cart.total_items(), 1);
/// assert!(state.wishlist.is_in_wishlist("sku-2"));
/// # Ok(())
/// # }
/// ```
pub struct ShoppingState<B: StorageBackend> {
    pub cart: CartStore<B>,
    pub wishlist: WishlistStore<B>,
    pub compare: CompareStore<B>,
    config: StoreConfig,
}

impl<B: StorageBackend> ShoppingState<B> {
    /// Open all three stores, hydrating each from its slot.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `config` is invalid. Unreadable slots do
    /// not fail the call; the affected store opens empty.
    pub fn open(backend: B, config: StoreConfig) -> Result<Self> {
        Self::open_with(backend, config, Arc::new(NoOpMetrics), Arc::new(LogNotifier))
    }

    /// Open with custom metrics and notifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `config` is invalid.
    pub fn open_with(
        backend: B,
        config: StoreConfig,
        metrics: Arc<dyn StoreMetrics>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;

        let cart: PersistedCollection<CartEntry, B> =
            PersistedCollection::new(backend.clone(), config.slot_for(StoreKind::Cart))
                .with_persistence(config.persist)
                .with_metrics(Arc::clone(&metrics))
                .hydrate();

        let wishlist: PersistedCollection<WishlistEntry, B> =
            PersistedCollection::new(backend.clone(), config.slot_for(StoreKind::Wishlist))
                .with_persistence(config.persist)
                .with_metrics(Arc::clone(&metrics))
                .hydrate();

        let compare: PersistedCollection<CompareEntry, B> =
            PersistedCollection::new(backend, config.slot_for(StoreKind::Compare))
                .with_capacity(config.compare_capacity)
                .with_persistence(config.persist)
                .with_metrics(metrics)
                .hydrate();

        info!(
            "✓ Shopping state opened: {} cart lines, {} saved, {} compared",
            cart.len(),
            wishlist.len(),
            compare.len()
        );

        Ok(ShoppingState {
            cart: CartStore::new(cart),
            wishlist: WishlistStore::new(wishlist),
            compare: CompareStore::new(compare).with_notifier(notifier),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Re-read all three slots.
    ///
    /// # Errors
    ///
    /// Returns the first failure; stores after it are not reloaded.
    pub fn rehydrate_all(&mut self) -> Result<()> {
        self.cart.rehydrate()?;
        self.wishlist.rehydrate()?;
        self.compare.rehydrate()?;
        Ok(())
    }

    /// Empty all three stores, e.g. on sign-out.
    ///
    /// # Errors
    ///
    /// Returns the first write-through failure.
    pub fn clear_all(&mut self) -> Result<()> {
        self.cart.clear_cart()?;
        self.wishlist.clear_wishlist()?;
        self.compare.clear_compare()?;
        Ok(())
    }
}
