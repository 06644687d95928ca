//! Filesystem storage backend.
//!
//! Stores each slot as `<dir>/<slot>.json`. Writes go to a uniquely named
//! temporary file in the same directory and are renamed into place, so a reader
//! never sees a half-written slot.

use super::StorageBackend;
use crate::error::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use tempfile::NamedTempFile;
use std::path::{Path, PathBuf};

/// Maximum slot size read from disk (1MB).
const MAX_SLOT_SIZE: u64 = 1024 * 1024;

const SLOT_EXTENSION: &str = "json";

/// Directory-backed storage backend.
///
/// # Example
///
/// ```no_run
/// use haven_store::backend::{FileBackend, StorageBackend};
///
/// # fn main() -> haven_store::Result<()> {
/// let backend = FileBackend::new("/var/lib/music-haven/state")?;
/// backend.set("cart-storage", b"{}".to_vec())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    /// Open a backend rooted at `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendError` if the directory cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| {
            Error::BackendError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        info!("✓ File backend initialized: {}", base_path.display());
        Ok(FileBackend { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_slot_name(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, SLOT_EXTENSION)))
    }
}

/// Slot names become file names: ASCII alphanumerics plus `-`, `_`, `:` and `.`,
/// no leading dot.
fn validate_slot_name(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::BackendError(format!("Invalid slot name: {:?}", key)))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("✓ File GET {} -> MISS", key);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.len() > MAX_SLOT_SIZE {
            return Err(Error::BackendError(format!(
                "Slot {} is {} bytes, larger than the {} byte limit",
                key,
                metadata.len(),
                MAX_SLOT_SIZE
            )));
        }

        let bytes = fs::read(&path)?;
        debug!("✓ File GET {} -> HIT ({} bytes)", key, bytes.len());
        Ok(Some(bytes))
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.slot_path(key)?;

        // Each write gets its own temp file, so concurrent writers never share
        // one and the last rename wins.
        let mut tmp = NamedTempFile::new_in(&self.base_path)?;
        tmp.write_all(&value)?;
        tmp.persist(&path).map_err(|e| {
            Error::BackendError(format!("Failed to replace slot {}: {}", key, e.error))
        })?;

        debug!("✓ File SET {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!("✓ File DELETE {}", key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.slot_path(key)?.is_file())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for dir_entry in fs::read_dir(&self.base_path)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn health_check(&self) -> Result<bool> {
        Ok(self.base_path.is_dir())
    }

    fn clear_all(&self) -> Result<()> {
        for key in self.keys()? {
            self.delete(&key)?;
        }
        warn!(
            "⚠ File CLEAR_ALL executed - all slots under {} cleared!",
            self.base_path.display()
        );
        Ok(())
    }
}
