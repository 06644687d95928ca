//! JSON slot format with a schema version tag.
//!
//! Every persisted collection is stored as one JSON document:
//!
//! ```text
//! { "state": { "items": [ <entry>, ... ] }, "version": <u32> }
//! ```
//!
//! This is the layout the storefront's browser persistence already writes, so
//! slots carried over from the web client load unchanged.
//!
//! # Loading
//!
//! 1. Parse the document (`Error::InvalidSlot` on malformed JSON)
//! 2. Read `version` (absent means 0, the pre-versioning layout)
//! 3. Run the migration chain from that version to the current one
//! 4. Decode each entry on its own; entries that fail to decode, fail
//!    validation or repeat an earlier identifier are dropped
//!
//! # Example
//!
//! ```rust
//! use haven_store::entry::WishlistEntry;
//! use haven_store::migration::MigrationChain;
//! use haven_store::serialization::{decode_slot, encode_slot};
//!
//! # fn main() -> haven_store::Result<()> {
//! let legacy = br#"{"state":{"items":[{"_id":"65a1f","name":"Cello"},{"name":"Ghost"}]},"version":0}"#;
//! let items = decode_slot::<WishlistEntry>(legacy, &MigrationChain::standard())?.items;
//! assert_eq!(items.len(), 1);
//!
//! let bytes = encode_slot(&items)?;
//! assert!(std::str::from_utf8(&bytes).unwrap().contains("\"version\":1"));
//! # Ok(())
//! # }
//! ```

use crate::entry::CollectionEntry;
use crate::error::{Error, Result};
use crate::migration::MigrationChain;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Current schema version written to every slot.
///
/// **CRITICAL:** Increment this constant when the entry layout changes, and add
/// a step to [`crate::migration::STANDARD_MIGRATIONS`] that upgrades the
/// previous version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct SlotStateRef<'a, T> {
    items: &'a [T],
}

#[derive(Serialize)]
struct SlotRef<'a, T> {
    state: SlotStateRef<'a, T>,
    version: u32,
}

/// Entries restored from a slot plus what was discarded on the way.
#[derive(Debug, Clone)]
pub struct DecodedSlot<E> {
    pub items: Vec<E>,
    /// Version the slot was written with
    pub stored_version: u32,
    /// Entries dropped for failing to decode, validate, or for duplicating an id
    pub dropped: usize,
}

/// Encode entries into a slot document at [`CURRENT_SCHEMA_VERSION`].
///
/// # Errors
///
/// Returns `Error::SerializationError` if an entry fails to serialize.
pub fn encode_slot<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    encode_slot_versioned(items, CURRENT_SCHEMA_VERSION)
}

/// Encode entries with an explicit version tag.
///
/// # Errors
///
/// Returns `Error::SerializationError` if an entry fails to serialize.
pub fn encode_slot_versioned<T: Serialize>(items: &[T], version: u32) -> Result<Vec<u8>> {
    let slot = SlotRef {
        state: SlotStateRef { items },
        version,
    };
    serde_json::to_vec(&slot).map_err(|e| {
        error!("Slot serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a slot document, migrating and validating its entries.
///
/// # Errors
///
/// - `Error::InvalidSlot`: not JSON, or not a JSON object
/// - `Error::VersionMismatch`: written by a newer schema
/// - `Error::MigrationGap`: the chain cannot reach the current version
pub fn decode_slot<E: CollectionEntry>(
    bytes: &[u8],
    migrations: &MigrationChain,
) -> Result<DecodedSlot<E>> {
    let document: Value = serde_json::from_slice(bytes).map_err(|e| {
        warn!("Persisted slot is not valid JSON: {}", e);
        Error::InvalidSlot(e.to_string())
    })?;

    let Value::Object(mut document) = document else {
        return Err(Error::InvalidSlot(
            "slot document is not a JSON object".to_string(),
        ));
    };

    let stored_version = match document.get("version") {
        None | Some(Value::Null) => 0,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| Error::InvalidSlot(format!("invalid version tag: {}", v)))?,
    };

    let state = document
        .remove("state")
        .unwrap_or_else(|| Value::Object(Default::default()));
    let state = migrations.upgrade(state, stored_version)?;

    let raw_items = match state {
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let total = raw_items.len();
    let mut seen = HashSet::new();
    let items: Vec<E> = raw_items
        .into_iter()
        .filter_map(|raw| decode_entry::<E>(raw))
        .filter(|entry| seen.insert(entry.id().clone()))
        .collect();

    let dropped = total - items.len();
    if dropped > 0 {
        debug!(
            "Hydration dropped {} of {} persisted entries (stored v{})",
            dropped, total, stored_version
        );
    }

    Ok(DecodedSlot {
        items,
        stored_version,
        dropped,
    })
}

fn decode_entry<E: CollectionEntry>(raw: Value) -> Option<E> {
    let entry: E = match serde_json::from_value(raw) {
        Ok(entry) => entry,
        Err(e) => {
            debug!("Discarding undecodable entry: {}", e);
            return None;
        }
    };
    match entry.validate() {
        Ok(()) => Some(entry),
        Err(e) => {
            debug!("Discarding invalid entry: {}", e);
            None
        }
    }
}
