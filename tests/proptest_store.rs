//! Property-based tests for the shopping stores.
//!
//! Random sequences of operations are applied to a `ShoppingState` and the
//! store invariants are checked after every step.
//!
//! # Properties Tested
//!
//! 1. **Uniqueness**: no collection ever holds two entries with the same id
//! 2. **Quantity floor**: every cart line has quantity >= 1
//! 3. **Capacity bound**: the compare list never exceeds its limit
//! 4. **Identity guard**: products without an id never change state
//! 5. **Toggle symmetry**: toggling twice restores wishlist membership
//! 6. **Persistence**: reopening over the same backend restores the same entries

use haven_store::backend::InMemoryBackend;
use haven_store::{Outcome, RawProduct, Rejection, ShoppingState, StoreConfig};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

// ============================================================================
// Operation Model
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    CartAdd(u8),
    CartRemove(u8),
    CartSetQuantity(u8, i64),
    CartClear,
    WishlistAdd(u8),
    WishlistToggle(u8),
    WishlistRemove(u8),
    CompareAdd(u8),
    CompareRemove(u8),
    AddWithoutId,
}

/// Small id space so duplicates are frequent.
fn arb_sku() -> impl Strategy<Value = u8> {
    0u8..8
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_sku().prop_map(Op::CartAdd),
        1 => arb_sku().prop_map(Op::CartRemove),
        2 => (arb_sku(), -3i64..6).prop_map(|(s, q)| Op::CartSetQuantity(s, q)),
        1 => Just(Op::CartClear),
        2 => arb_sku().prop_map(Op::WishlistAdd),
        2 => arb_sku().prop_map(Op::WishlistToggle),
        1 => arb_sku().prop_map(Op::WishlistRemove),
        3 => arb_sku().prop_map(Op::CompareAdd),
        1 => arb_sku().prop_map(Op::CompareRemove),
        1 => Just(Op::AddWithoutId),
    ]
}

fn sku(n: u8) -> String {
    format!("sku-{}", n)
}

/// Half the products carry the API's `_id` field instead of `id`.
fn product(n: u8) -> RawProduct {
    let raw = if n % 2 == 0 {
        RawProduct::new(sku(n))
    } else {
        RawProduct::with_legacy_id(sku(n))
    };
    raw.with_name(format!("Product {}", n))
        .with_price(Decimal::from(u32::from(n) * 10 + 5))
}

fn apply(state: &mut ShoppingState<InMemoryBackend>, op: &Op) -> Outcome {
    let result = match op {
        Op::CartAdd(n) => state.cart.add_item(&product(*n)),
        Op::CartRemove(n) => state.cart.remove_item(&sku(*n)),
        Op::CartSetQuantity(n, q) => state.cart.update_quantity(&sku(*n), *q),
        Op::CartClear => state.cart.clear_cart(),
        Op::WishlistAdd(n) => state.wishlist.add_item(&product(*n)),
        Op::WishlistToggle(n) => state.wishlist.toggle_item(&product(*n)),
        Op::WishlistRemove(n) => state.wishlist.remove_item(&sku(*n)),
        Op::CompareAdd(n) => state.compare.add_item(&product(*n)),
        Op::CompareRemove(n) => state.compare.remove_item(&sku(*n)),
        Op::AddWithoutId => state.cart.add_item(&RawProduct::default().with_name("?")),
    };
    result.expect("in-memory writes never fail")
}

fn all_unique<'a>(mut ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    ids.all(|id| seen.insert(id))
}

// ============================================================================
// Invariant Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_invariants_hold_after_every_step(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();

        for op in &ops {
            apply(&mut state, op);

            prop_assert!(all_unique(state.cart.items().iter().map(|e| e.product.id.as_str())));
            prop_assert!(all_unique(state.wishlist.items().iter().map(|e| e.0.id.as_str())));
            prop_assert!(all_unique(state.compare.items().iter().map(|e| e.0.id.as_str())));

            prop_assert!(state.cart.items().iter().all(|e| e.quantity >= 1),
                "cart line with zero quantity after {:?}", op);
            prop_assert!(state.compare.len() <= 4, "compare list over capacity after {:?}", op);
        }
    }

    #[test]
    fn prop_state_survives_reopen(ops in prop::collection::vec(arb_op(), 0..40)) {
        let backend = InMemoryBackend::new();
        let mut state = ShoppingState::open(backend.clone(), StoreConfig::default()).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }

        let reopened = ShoppingState::open(backend, StoreConfig::default()).unwrap();
        prop_assert_eq!(reopened.cart.items(), state.cart.items());
        prop_assert_eq!(reopened.wishlist.items(), state.wishlist.items());
        prop_assert_eq!(reopened.compare.items(), state.compare.items());
    }

    #[test]
    fn prop_capacity_rejection_keeps_compare_list(extra in 4u8..8) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        for n in 0..4 {
            state.compare.add_item(&product(n)).unwrap();
        }
        let before = state.compare.items().to_vec();

        let outcome = state.compare.add_item(&product(extra)).unwrap();
        prop_assert_eq!(outcome, Outcome::Rejected(Rejection::CapacityExceeded { limit: 4 }));
        prop_assert_eq!(state.compare.items(), before.as_slice());
    }
}

// ============================================================================
// Guard and Symmetry Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_identity_guard(
        ops in prop::collection::vec(arb_op(), 0..20),
        name in "[a-zA-Z ]{0,20}",
    ) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }
        let cart = state.cart.items().to_vec();
        let wishlist = state.wishlist.items().to_vec();
        let compare = state.compare.items().to_vec();

        let nameless = RawProduct::default().with_name(name);
        prop_assert!(state.cart.add_item(&nameless).unwrap().is_rejected());
        prop_assert!(state.wishlist.toggle_item(&nameless).unwrap().is_rejected());
        prop_assert!(state.compare.add_item(&nameless).unwrap().is_rejected());

        prop_assert_eq!(state.cart.items(), cart.as_slice());
        prop_assert_eq!(state.wishlist.items(), wishlist.as_slice());
        prop_assert_eq!(state.compare.items(), compare.as_slice());
    }

    #[test]
    fn prop_toggle_twice_restores_membership(
        ops in prop::collection::vec(arb_op(), 0..20),
        n in arb_sku(),
    ) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }
        let was_saved = state.wishlist.is_in_wishlist(&sku(n));

        state.wishlist.toggle_item(&product(n)).unwrap();
        prop_assert_eq!(state.wishlist.is_in_wishlist(&sku(n)), !was_saved);
        state.wishlist.toggle_item(&product(n)).unwrap();
        prop_assert_eq!(state.wishlist.is_in_wishlist(&sku(n)), was_saved);
    }

    #[test]
    fn prop_quantity_update_floor(n in arb_sku(), quantity in -100i64..100) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        state.cart.add_item(&product(n)).unwrap();

        state.cart.update_quantity(&sku(n), quantity).unwrap();
        if quantity <= 0 {
            prop_assert!(state.cart.get(&sku(n)).is_none());
        } else {
            prop_assert_eq!(i64::from(state.cart.quantity_of(&sku(n))), quantity);
        }
    }

    #[test]
    fn prop_cart_total_matches_lines(adds in prop::collection::vec(arb_sku(), 0..30)) {
        let mut state = ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        for n in &adds {
            state.cart.add_item(&product(*n)).unwrap();
        }

        let expected: Decimal = adds
            .iter()
            .map(|n| Decimal::from(u32::from(*n) * 10 + 5))
            .sum();
        prop_assert_eq!(state.cart.total_price(), expected);
        prop_assert_eq!(state.cart.total_items(), adds.len() as u64);
    }
}

// ============================================================================
// QuickCheck
// ============================================================================

/// Adding the same product any number of times leaves one line whose quantity
/// is the number of adds.
#[test]
fn quickcheck_repeated_adds_accumulate() {
    fn prop(times: u8) -> bool {
        let times = times % 50;
        let mut state =
            ShoppingState::open(InMemoryBackend::new(), StoreConfig::default()).unwrap();
        for _ in 0..times {
            state.cart.add_item(&product(3)).unwrap();
        }
        state.cart.items().len() == usize::from(times > 0)
            && state.cart.quantity_of(&sku(3)) == u32::from(times)
    }

    quickcheck::quickcheck(prop as fn(u8) -> bool);
}
