//! Store configuration.

use crate::error::{Error, Result};
use crate::key::{SlotKeyBuilder, StoreKind};

/// Default maximum number of products in the compare list.
pub const DEFAULT_COMPARE_CAPACITY: usize = 4;

/// Environment variable holding an optional slot prefix.
pub const ENV_SLOT_PREFIX: &str = "HAVEN_SLOT_PREFIX";

/// Environment variable overriding the compare capacity.
pub const ENV_COMPARE_CAPACITY: &str = "HAVEN_COMPARE_CAPACITY";

/// Configuration shared by the three stores of a [`crate::ShoppingState`].
///
/// # Example
///
/// ```
/// use haven_store::StoreConfig;
///
/// let config = StoreConfig::default().with_slot_prefix("guest-42");
/// assert_eq!(config.compare_capacity, 4);
/// ```
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Namespace for slot keys, e.g. one per signed-in user.
    pub slot_prefix: Option<String>,

    /// Maximum number of compare entries.
    pub compare_capacity: usize,

    /// Write every mutation through to the backend. When `false` the stores
    /// still hydrate on open but never write.
    pub persist: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            slot_prefix: None,
            compare_capacity: DEFAULT_COMPARE_CAPACITY,
            persist: true,
        }
    }
}

impl StoreConfig {
    pub fn with_slot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.slot_prefix = Some(prefix.into());
        self
    }

    pub fn with_compare_capacity(mut self, capacity: usize) -> Self {
        self.compare_capacity = capacity;
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persist = enabled;
        self
    }

    /// Read overrides from `HAVEN_SLOT_PREFIX` and `HAVEN_COMPARE_CAPACITY`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the capacity is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let mut config = StoreConfig::default();

        if let Ok(prefix) = std::env::var(ENV_SLOT_PREFIX) {
            if !prefix.is_empty() {
                config.slot_prefix = Some(prefix);
            }
        }

        if let Ok(raw) = std::env::var(ENV_COMPARE_CAPACITY) {
            config.compare_capacity = raw.trim().parse().map_err(|e| {
                Error::ConfigError(format!(
                    "{} must be a positive integer, got {:?}: {}",
                    ENV_COMPARE_CAPACITY, raw, e
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::ConfigError` for a zero capacity or a prefix containing
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn validate(&self) -> Result<()> {
        if self.compare_capacity == 0 {
            return Err(Error::ConfigError(
                "compare capacity must be at least 1".to_string(),
            ));
        }

        if let Some(prefix) = &self.slot_prefix {
            let valid = prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(Error::ConfigError(format!(
                    "slot prefix {:?} may only contain ASCII letters, digits, '-' and '_'",
                    prefix
                )));
            }
        }

        Ok(())
    }

    /// Slot key for a store kind under this configuration.
    pub fn slot_for(&self, kind: StoreKind) -> String {
        SlotKeyBuilder::build(self.slot_prefix.as_deref(), kind)
    }
}
