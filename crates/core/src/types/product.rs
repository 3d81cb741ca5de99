//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::Price;

/// A product offered on the menu.
///
/// Products are immutable catalog data. The same shape is embedded in print
/// snapshots, so the serialized form uses the storefront's camelCase names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Price,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            image: image.into(),
            price,
        }
    }

    /// Whether the product can be added to a cart.
    ///
    /// Zero-price products are previews ("coming soon") and are never orderable.
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        !self.price.is_zero()
    }
}
