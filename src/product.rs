//! Product references and identifier normalization.
//!
//! Catalog data reaches the stores in two shapes: documents from the API carry
//! their identifier under `_id`, static catalog files carry it under `id`, and
//! either may be a string or a number. [`resolve_identifier`] folds both into a
//! single [`ProductId`].

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as it appears on the wire: text or a bare JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            IdRepr::Text(s) => s,
            IdRepr::Number(n) => n.to_string(),
        }
    }
}

/// Canonical, non-blank product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IdRepr", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse an identifier, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(ProductId(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<IdRepr> for ProductId {
    type Error = String;

    fn try_from(value: IdRepr) -> std::result::Result<Self, Self::Error> {
        ProductId::parse(value.into_string()).ok_or_else(|| "blank product id".to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a catalog item taken when it enters a store.
///
/// Later catalog changes do not propagate into existing entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Written as a JSON number like the browser's slots; read from numbers
    /// or decimal strings.
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ProductRef {
    /// Minimal snapshot, mostly useful in tests and demos.
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        ProductRef {
            id,
            name: name.into(),
            price,
            images: Vec::new(),
            description: None,
            rating: None,
        }
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let repr: Option<IdRepr> = Option::deserialize(deserializer)?;
    Ok(repr.map(IdRepr::into_string))
}

/// Product-like object handed to the stores by UI code.
///
/// Every field is optional; unknown fields are ignored. Only the identifier is
/// required to turn it into a [`ProductRef`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl RawProduct {
    /// Product carrying its identifier under `id`.
    pub fn new(id: impl Into<String>) -> Self {
        RawProduct {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Product carrying its identifier under the API's `_id` field.
    pub fn with_legacy_id(id: impl Into<String>) -> Self {
        RawProduct {
            legacy_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Parse a product object from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeserializationError` when the text is not a JSON object
    /// of the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::DeserializationError(e.to_string()))
    }

    /// Build the snapshot stored in an entry, or `None` when no identifier resolves.
    pub fn snapshot(&self) -> Option<ProductRef> {
        let id = resolve_identifier(self)?;
        Some(ProductRef {
            id,
            name: self.name.clone().unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            images: self.images.clone(),
            description: self.description.clone(),
            rating: self.rating,
        })
    }
}

impl From<&ProductRef> for RawProduct {
    fn from(product: &ProductRef) -> Self {
        RawProduct {
            id: Some(product.id.as_str().to_string()),
            legacy_id: None,
            name: Some(product.name.clone()),
            price: Some(product.price),
            images: product.images.clone(),
            description: product.description.clone(),
            rating: product.rating,
        }
    }
}

/// Resolve the canonical identifier of a raw product.
///
/// `id` wins over `_id`; blank values count as absent.
pub fn resolve_identifier(raw: &RawProduct) -> Option<ProductId> {
    raw.id
        .as_deref()
        .and_then(ProductId::parse)
        .or_else(|| raw.legacy_id.as_deref().and_then(ProductId::parse))
}
