//! Mutation outcomes.
//!
//! Every store mutator reports what happened instead of silently no-op'ing, so
//! callers can tell an applied change from each kind of refusal.

use std::fmt;

/// Why a mutation was refused. State is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The product carried neither `id` nor `_id`.
    MissingIdentifier,
    /// A removal or update was requested with a blank identifier.
    InvalidKey,
    /// The collection is already at its size limit.
    CapacityExceeded { limit: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingIdentifier => write!(f, "product has no identifier"),
            Rejection::InvalidKey => write!(f, "identifier is empty"),
            Rejection::CapacityExceeded { limit } => {
                write!(f, "you can compare up to {} products at a time", limit)
            }
        }
    }
}

/// Result of a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new entry was appended.
    Added,
    /// An existing cart entry now has this quantity.
    QuantityChanged { quantity: u32 },
    /// The entry was removed.
    Removed,
    /// The collection was emptied.
    Cleared,
    /// Nothing to do: duplicate add or removal of an absent entry.
    Unchanged,
    /// A guard refused the mutation.
    Rejected(Rejection),
}

impl Outcome {
    /// True when the collection was modified.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::Unchanged | Outcome::Rejected(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}
