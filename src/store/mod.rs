//! The three storefront collections built on [`crate::collection::PersistedCollection`].

pub mod cart;
pub mod compare;
pub mod wishlist;

pub use cart::CartStore;
pub use compare::CompareStore;
pub use wishlist::WishlistStore;
