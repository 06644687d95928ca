//! A shopper's session against file-backed stores.
//!
//! Run twice to see the cart restored from disk:
//!
//! ```text
//! cargo run --example shopping_session
//! ```

use haven_store::backend::FileBackend;
use haven_store::observability::{LogMetrics, LogNotifier};
use haven_store::{Outcome, RawProduct, Result, ShoppingState, StoreConfig};
use rust_decimal::Decimal;
use std::sync::Arc;

fn catalog() -> Vec<RawProduct> {
    vec![
        RawProduct::new("gtr-001")
            .with_name("Stratocaster")
            .with_price(Decimal::new(79999, 2))
            .with_image("/img/strat.png")
            .with_rating(4.8),
        // Items from the API carry `_id` instead of `id`.
        RawProduct::with_legacy_id("65a1f0c2")
            .with_name("Digital Piano")
            .with_price(Decimal::new(54900, 2)),
        RawProduct::new("drm-017")
            .with_name("Snare Drum")
            .with_price(Decimal::new(18950, 2)),
        RawProduct::new("amp-003")
            .with_name("Tube Combo")
            .with_price(Decimal::new(112000, 2)),
        RawProduct::new("mic-110")
            .with_name("Condenser Mic")
            .with_price(Decimal::new(24900, 2)),
    ]
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Music Haven - Shopping Session ===\n");

    // 1. Open stores
    let dir = std::env::temp_dir().join("haven-store-demo");
    println!("1. Opening stores under {}...", dir.display());
    let config = StoreConfig::from_env()?;
    let mut state = ShoppingState::open_with(
        FileBackend::new(&dir)?,
        config,
        Arc::new(LogMetrics),
        Arc::new(LogNotifier),
    )?;
    println!(
        "   ✓ Restored {} cart items ({})\n",
        state.cart.total_items(),
        state.cart.total_price()
    );

    let products = catalog();

    // 2. Cart
    println!("2. Adding to cart:");
    state.cart.subscribe(|lines| {
        println!("   [listener] cart now has {} lines", lines.len());
    });
    for product in &products[..3] {
        let outcome = state.cart.add_item(product)?;
        println!("   {:?} -> {:?}", product.name, outcome);
    }
    state.cart.add_item(&products[0])?;
    state.cart.update_quantity("drm-017", 3)?;
    for line in state.cart.items() {
        println!(
            "   - {} x{} = {}",
            line.product.name,
            line.quantity,
            line.line_total()
        );
    }
    println!("   ✓ Total: {}\n", state.cart.total_price());

    // 3. Wishlist
    println!("3. Toggling the wishlist:");
    for product in [&products[3], &products[4], &products[3]] {
        let outcome = state.wishlist.toggle_item(product)?;
        println!("   {:?} -> {:?}", product.name, outcome);
    }
    println!("   ✓ Saved: {} items\n", state.wishlist.len());

    // 4. Compare, one past capacity
    println!("4. Comparing:");
    state.compare.clear_compare()?;
    for product in &products {
        match state.compare.add_item(product)? {
            Outcome::Rejected(reason) => println!("   ✗ {:?}: {}", product.name, reason),
            outcome => println!("   {:?} -> {:?}", product.name, outcome),
        }
    }
    println!(
        "   ✓ Comparing {}/{} products\n",
        state.compare.len(),
        state.compare.capacity().unwrap_or_default()
    );

    // 5. Guard
    println!("5. Product without an identifier:");
    let outcome = state.cart.add_item(&RawProduct::default().with_name("Mystery Box"))?;
    println!("   ✓ {:?}\n", outcome);

    println!("=== Session saved; run again to restore it ===\n");
    Ok(())
}
