//! # haven-store
//!
//! Persisted cart, wishlist and compare stores for the Music Haven storefront.
//!
//! ## Features
//!
//! - **One generic store:** cart, wishlist and compare share
//!   [`PersistedCollection`] and differ only in entry type and capacity
//! - **Explicit outcomes:** mutators return [`Outcome`], never silently no-op
//! - **Write-through persistence:** every applied mutation is mirrored to a
//!   named slot in a [`StorageBackend`] (in-memory or filesystem)
//! - **Versioned slots:** stored state is upgraded through a [`MigrationChain`]
//!   and scrubbed of unusable entries on load
//! - **Explicit instances:** [`ShoppingState`] is a plain value, not a global
//!
//! ## Quick Start
//!
//! ```
//! use haven_store::{backend::InMemoryBackend, Outcome, RawProduct, ShoppingState, StoreConfig};
//! use rust_decimal::Decimal;
//!
//! # fn main() -> haven_store::Result<()> {
//! let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default())?;
//!
//! let guitar = RawProduct::new("sku-1")
//!     .with_name("Telecaster")
//!     .with_price(Decimal::from(500));
//!
//! assert_eq!(state.cart.add_item(&guitar)?, Outcome::Added);
//! assert_eq!(state.cart.add_item(&guitar)?, Outcome::QuantityChanged { quantity: 2 });
//! assert_eq!(state.cart.total_price(), Decimal::from(1000));
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod collection;
pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod migration;
pub mod observability;
pub mod outcome;
pub mod product;
pub mod serialization;
pub mod state;
pub mod store;

// Re-exports for convenience
pub use backend::StorageBackend;
pub use collection::{PersistedCollection, SubscriptionId};
pub use config::StoreConfig;
pub use entry::{CartEntry, CollectionEntry, CompareEntry, WishlistEntry};
pub use error::{Error, Result};
pub use key::StoreKind;
pub use migration::{Migration, MigrationChain};
pub use outcome::{Outcome, Rejection};
pub use product::{resolve_identifier, ProductId, ProductRef, RawProduct};
pub use state::ShoppingState;
pub use store::{CartStore, CompareStore, WishlistStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
