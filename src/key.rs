//! Storage slot naming.

use std::fmt;

/// The three collection kinds, each persisted in its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Cart,
    Wishlist,
    Compare,
}

impl StoreKind {
    /// Slot name used by the storefront's browser persistence.
    pub fn default_slot(&self) -> &'static str {
        match self {
            StoreKind::Cart => "cart-storage",
            StoreKind::Wishlist => "wishlist-storage",
            StoreKind::Compare => "compare-storage",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Cart => "cart",
            StoreKind::Wishlist => "wishlist",
            StoreKind::Compare => "compare",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for slot keys.
pub struct SlotKeyBuilder;

impl SlotKeyBuilder {
    /// Slot key for a store kind, optionally namespaced: `"{prefix}:{slot}"`.
    pub fn build(prefix: Option<&str>, kind: StoreKind) -> String {
        match prefix {
            Some(p) if !p.is_empty() => format!("{}:{}", p, kind.default_slot()),
            _ => kind.default_slot().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        assert_eq!(SlotKeyBuilder::build(None, StoreKind::Cart), "cart-storage");
        assert_eq!(
            SlotKeyBuilder::build(None, StoreKind::Wishlist),
            "wishlist-storage"
        );
        assert_eq!(
            SlotKeyBuilder::build(None, StoreKind::Compare),
            "compare-storage"
        );
    }

    #[test]
    fn test_prefixed_slot() {
        let key = SlotKeyBuilder::build(Some("guest-42"), StoreKind::Cart);
        assert_eq!(key, "guest-42:cart-storage");
    }

    #[test]
    fn test_empty_prefix_ignored() {
        assert_eq!(
            SlotKeyBuilder::build(Some(""), StoreKind::Compare),
            "compare-storage"
        );
    }
}
