//! Versioned migration chain for persisted collection state.
//!
//! A migration is a pure function over the JSON `state` object of a slot. The
//! chain applies steps one after another, starting at the stored version, until
//! the current version is reached.

use crate::error::{Error, Result};
use crate::product::ProductId;
use serde_json::Value;

/// Transformation applied to a slot's `state` object.
pub type MigrationFn = fn(Value) -> Value;

/// One step of the chain.
#[derive(Clone, Copy)]
pub struct Migration {
    pub from_version: u32,
    pub to_version: u32,
    pub transform: MigrationFn,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .finish()
    }
}

/// Built-in steps shared by every store kind.
pub const STANDARD_MIGRATIONS: &[Migration] = &[Migration {
    from_version: 0,
    to_version: 1,
    transform: drop_unidentified_entries,
}];

/// Ordered set of migrations ending at `current_version`.
#[derive(Clone, Debug)]
pub struct MigrationChain {
    current_version: u32,
    steps: Vec<Migration>,
}

impl MigrationChain {
    /// Empty chain: only documents already at `current_version` load.
    pub fn new(current_version: u32) -> Self {
        MigrationChain {
            current_version,
            steps: Vec::new(),
        }
    }

    /// The chain every store uses by default.
    pub fn standard() -> Self {
        STANDARD_MIGRATIONS
            .iter()
            .fold(
                MigrationChain::new(crate::serialization::CURRENT_SCHEMA_VERSION),
                |chain, step| chain.with_step(*step),
            )
    }

    pub fn with_step(mut self, step: Migration) -> Self {
        self.steps.push(step);
        self
    }

    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    /// Upgrade `state` from `version` to the current version.
    ///
    /// # Errors
    ///
    /// - `Error::VersionMismatch`: `version` is newer than the chain
    /// - `Error::MigrationGap`: no step starts at an intermediate version, or a
    ///   step does not move forward
    pub fn upgrade(&self, mut state: Value, mut version: u32) -> Result<Value> {
        if version > self.current_version {
            return Err(Error::VersionMismatch {
                expected: self.current_version,
                found: version,
            });
        }

        while version < self.current_version {
            let step = self
                .steps
                .iter()
                .find(|s| s.from_version == version && s.to_version > version)
                .ok_or(Error::MigrationGap { from: version })?;

            debug!(
                "» Migrating persisted state v{} -> v{}",
                step.from_version, step.to_version
            );
            state = (step.transform)(state);
            version = step.to_version;
        }

        Ok(state)
    }
}

impl Default for MigrationChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// v0 -> v1: drop entries without a usable identifier and move `_id` to `id`.
///
/// Early releases let products without an `id` into the stores; those entries
/// can never be removed again and are discarded here.
pub fn drop_unidentified_entries(mut state: Value) -> Value {
    let Some(items) = state.get_mut("items").and_then(Value::as_array_mut) else {
        return state;
    };

    let before = items.len();
    items.retain_mut(|item| match canonical_id(item) {
        Some(id) => {
            if let Some(obj) = item.as_object_mut() {
                obj.remove("_id");
                obj.insert("id".to_string(), Value::String(id));
            }
            true
        }
        None => false,
    });

    let dropped = before - items.len();
    if dropped > 0 {
        debug!("Migration dropped {} unidentified entries", dropped);
    }
    state
}

fn canonical_id(item: &Value) -> Option<String> {
    let text = |v: &Value| match v {
        Value::String(s) => ProductId::parse(s.as_str()).map(String::from),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    let obj = item.as_object()?;
    obj.get("id")
        .and_then(text)
        .or_else(|| obj.get("_id").and_then(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_version_passes_through() {
        let chain = MigrationChain::standard();
        let state = json!({"items": [{"id": "sku-1"}]});
        let upgraded = chain
            .upgrade(state.clone(), chain.current_version())
            .unwrap();
        assert_eq!(upgraded, state);
    }

    #[test]
    fn test_v0_drops_unidentified_and_canonicalizes() {
        let chain = MigrationChain::standard();
        let state = json!({"items": [
            {"id": "sku-1", "name": "Violin"},
            {"name": "Ghost"},
            {"_id": "65a1f", "name": "Cello"},
            {"id": "", "name": "Blank"},
            {"id": 7, "name": "Triangle"}
        ]});

        let upgraded = chain.upgrade(state, 0).unwrap();
        assert_eq!(
            upgraded,
            json!({"items": [
                {"id": "sku-1", "name": "Violin"},
                {"id": "65a1f", "name": "Cello"},
                {"id": "7", "name": "Triangle"}
            ]})
        );
    }

    #[test]
    fn test_future_version_rejected() {
        let chain = MigrationChain::standard();
        let result = chain.upgrade(json!({"items": []}), 9);
        assert!(matches!(
            result,
            Err(Error::VersionMismatch { expected: 1, found: 9 })
        ));
    }

    #[test]
    fn test_chained_steps_apply_in_order() {
        let chain = MigrationChain::new(3)
            .with_step(Migration {
                from_version: 1,
                to_version: 2,
                transform: |mut v| {
                    v["trail"] = json!("a");
                    v
                },
            })
            .with_step(Migration {
                from_version: 2,
                to_version: 3,
                transform: |mut v| {
                    let trail = v["trail"].as_str().unwrap_or_default().to_string();
                    v["trail"] = json!(format!("{}b", trail));
                    v
                },
            });

        let upgraded = chain.upgrade(json!({}), 1).unwrap();
        assert_eq!(upgraded["trail"], "ab");
    }

    #[test]
    fn test_missing_step_is_a_gap() {
        let chain = MigrationChain::new(2);
        let result = chain.upgrade(json!({}), 1);
        assert!(matches!(result, Err(Error::MigrationGap { from: 1 })));
    }

    #[test]
    fn test_state_without_items_is_untouched() {
        let state = json!({"other": true});
        assert_eq!(drop_unidentified_entries(state.clone()), state);
    }
}
