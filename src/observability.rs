//! Observability hooks and user-facing notifications.
//!
//! Two concerns live here:
//!
//! - **Metrics (`StoreMetrics`)**: hooks for every mutation, rejection and
//!   persistence write, for whatever monitoring the host application runs
//! - **Notifications (`Notifier`)**: the channel through which rejections that
//!   the shopper must see (a full compare list) are surfaced
//!
//! # Metrics
//!
//! ```
//! use haven_store::observability::StoreMetrics;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct RejectionCounter(AtomicUsize);
//!
//! impl StoreMetrics for RejectionCounter {
//!     fn record_rejected(&self, _slot: &str, _reason: &haven_store::Rejection) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```
//!
//! Stores default to `NoOpMetrics`. Implement the trait without overriding
//! anything to get the logging defaults.

use crate::outcome::Rejection;
use std::time::Duration;

/// Trait for store metrics collection.
pub trait StoreMetrics: Send + Sync {
    /// Record a new entry or a quantity change.
    fn record_added(&self, slot: &str, id: &str) {
        debug!("Store ADD: {} -> {}", slot, id);
    }

    /// Record a removal.
    fn record_removed(&self, slot: &str, id: &str) {
        debug!("Store REMOVE: {} -> {}", slot, id);
    }

    /// Record a guard rejection.
    fn record_rejected(&self, slot: &str, reason: &Rejection) {
        warn!("Store REJECTED in {}: {}", slot, reason);
    }

    /// Record a persistence write.
    fn record_persisted(&self, slot: &str, entries: usize, duration: Duration) {
        debug!(
            "Store PERSIST: {} ({} entries) took {:?}",
            slot, entries, duration
        );
    }

    /// Record a persistence or hydration failure.
    fn record_error(&self, slot: &str, error: &str) {
        warn!("Store ERROR for {}: {}", slot, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    fn record_added(&self, _slot: &str, _id: &str) {}
    fn record_removed(&self, _slot: &str, _id: &str) {}
    fn record_rejected(&self, _slot: &str, _reason: &Rejection) {}
    fn record_persisted(&self, _slot: &str, _entries: usize, _duration: Duration) {}
    fn record_error(&self, _slot: &str, _error: &str) {}
}

/// Metrics implementation that only uses the logging defaults.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl StoreMetrics for LogMetrics {}

/// Synchronous, user-facing notification channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, rejection: &Rejection);
}

/// Default notifier: writes the message to the log at warn level.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, rejection: &Rejection) {
        warn!("{}", rejection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl Notifier for Recording {
        fn notify(&self, rejection: &Rejection) {
            self.0.lock().unwrap().push(rejection.to_string());
        }
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_added("cart-storage", "sku-1");
        metrics.record_persisted("cart-storage", 1, Duration::from_millis(1));
    }

    #[test]
    fn test_log_defaults_do_not_panic() {
        let metrics = LogMetrics;
        metrics.record_rejected("compare-storage", &Rejection::CapacityExceeded { limit: 4 });
        metrics.record_error("cart-storage", "disk full");
        LogNotifier.notify(&Rejection::InvalidKey);
    }

    #[test]
    fn test_custom_notifier_receives_message() {
        let notifier = Recording::default();
        notifier.notify(&Rejection::CapacityExceeded { limit: 4 });
        assert_eq!(
            notifier.0.lock().unwrap().as_slice(),
            ["you can compare up to 4 products at a time".to_string()]
        );
    }
}
