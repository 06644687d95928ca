//! Entry trait implemented by every collection's element type.

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::product::{ProductId, ProductRef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Element stored in a [`crate::collection::PersistedCollection`].
///
/// # Example
///
/// ```
/// use haven_store::entry::CollectionEntry;
/// use haven_store::product::ProductRef;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// #[serde(transparent)]
/// struct Recent(ProductRef);
///
/// impl CollectionEntry for Recent {
///     fn from_product(product: ProductRef) -> Self { Recent(product) }
///     fn product(&self) -> &ProductRef { &self.0 }
/// }
/// ```
pub trait CollectionEntry: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Build a fresh entry from a snapshot.
    fn from_product(product: ProductRef) -> Self;

    /// The snapshot this entry holds.
    fn product(&self) -> &ProductRef;

    fn id(&self) -> &ProductId {
        &self.product().id
    }

    /// Called when an add targets an identifier that is already present.
    ///
    /// Default leaves the entry alone.
    fn merge_duplicate(&mut self) -> Outcome {
        Outcome::Unchanged
    }

    /// Validate an entry restored from storage.
    ///
    /// Entries failing validation are dropped during hydration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Cart line: product snapshot plus quantity.
///
/// Stored flattened (`{"id": .., "name": .., "quantity": 2}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: ProductRef,
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price times quantity, saturating at `Decimal::MAX` / `Decimal::MIN`.
    pub fn line_total(&self) -> rust_decimal::Decimal {
        self.product
            .price
            .saturating_mul(rust_decimal::Decimal::from(self.quantity))
    }
}

impl CollectionEntry for CartEntry {
    fn from_product(product: ProductRef) -> Self {
        CartEntry {
            product,
            quantity: 1,
        }
    }

    fn product(&self) -> &ProductRef {
        &self.product
    }

    fn merge_duplicate(&mut self) -> Outcome {
        self.quantity = self.quantity.saturating_add(1);
        Outcome::QuantityChanged {
            quantity: self.quantity,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::ValidationError(format!(
                "cart entry {} has quantity 0",
                self.product.id
            )));
        }
        Ok(())
    }
}

/// Wishlist entry: the bare snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistEntry(pub ProductRef);

impl CollectionEntry for WishlistEntry {
    fn from_product(product: ProductRef) -> Self {
        WishlistEntry(product)
    }

    fn product(&self) -> &ProductRef {
        &self.0
    }
}

/// Compare entry: the bare snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareEntry(pub ProductRef);

impl CollectionEntry for CompareEntry {
    fn from_product(product: ProductRef) -> Self {
        CompareEntry(product)
    }

    fn product(&self) -> &ProductRef {
        &self.0
    }
}
