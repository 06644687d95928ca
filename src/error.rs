//! Error types for the store crate.
//!
//! Guard conditions (missing identifier, blank key, full compare list) are not
//! errors: they come back as [`crate::Outcome::Rejected`]. The variants below
//! cover persistence and configuration failures only.

use std::fmt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the store crate.
#[derive(Debug, Clone)]
pub enum Error {
    /// Encoding the entry list for the storage slot failed.
    SerializationError(String),

    /// A stored entry could not be decoded into its typed form.
    ///
    /// Raised per entry during hydration; those entries are dropped rather than
    /// failing the whole load.
    DeserializationError(String),

    /// An entry violates a collection invariant.
    ///
    /// Common causes:
    /// - Cart entry with a quantity of zero
    /// - Identifier that is blank after trimming
    ValidationError(String),

    /// Storage backend failure (file I/O, unreadable slot, invalid slot name).
    ///
    /// **Recovery:** The in-memory state is still authoritative; the next
    /// successful mutation rewrites the slot.
    BackendError(String),

    /// The slot content is not a persisted collection document.
    ///
    /// Returned when the bytes are not valid JSON or the document is not an
    /// object. The store opens empty.
    InvalidSlot(String),

    /// The slot was written by a newer schema than this build understands.
    ///
    /// The store opens empty and leaves the slot untouched until the next
    /// mutation overwrites it.
    VersionMismatch {
        /// Version this build writes
        expected: u32,
        /// Version found in the slot
        found: u32,
    },

    /// No migration step starts at the given version.
    MigrationGap {
        /// Version the chain got stuck at
        from: u32,
    },

    /// Invalid store configuration.
    ConfigError(String),

    /// Backend does not support the requested operation.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidSlot(msg) => write!(f, "Invalid storage slot: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Slot version mismatch: expected at most {}, found {}",
                    expected, found
                )
            }
            Error::MigrationGap { from } => {
                write!(f, "No migration registered from version {}", from)
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_eof() {
            Error::InvalidSlot(e.to_string())
        } else if e.is_data() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
