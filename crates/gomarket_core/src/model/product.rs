//! Cart line item model.
//!
//! # Responsibility
//! - Define the persisted product record and the catalog-side input shape.
//! - Provide validation used on every write and read of persisted state.
//!
//! # Invariants
//! - `id` is the unique key within a cart; it is never empty.
//! - `quantity` is always >= 1 in a valid record.
//! - The serde wire shape is `{id, title, image_url, price, quantity}` and
//!   must stay compatible with snapshots written by older app versions.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable catalog identifier for a product.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// IDs are assigned by the product catalog, not generated locally.
pub type ProductId = String;

/// A product line in the cart: identity, display metadata, unit price and
/// the number of units currently in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique key within the cart, assigned by the catalog.
    pub id: ProductId,
    /// Display title shown in cart views.
    pub title: String,
    /// Display image URL; opaque to core, rendered by the UI.
    pub image_url: String,
    /// Unit price in the store currency.
    pub price: f64,
    /// Units of this product in the cart. Always >= 1 in a valid record.
    pub quantity: u32,
}

/// Catalog-side input for adding a product to the cart.
///
/// Deliberately has no `quantity` field: the cart owns quantity, and a new
/// line always starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

/// Validation failures for product records.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    /// The catalog id is empty or whitespace-only.
    EmptyId,
    /// Quantity dropped to zero in a persisted or constructed record.
    ZeroQuantity { id: ProductId },
    /// Price is negative, NaN or infinite.
    InvalidPrice { id: ProductId, price: f64 },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "product id cannot be empty"),
            Self::ZeroQuantity { id } => {
                write!(f, "product `{id}` has zero quantity")
            }
            Self::InvalidPrice { id, price } => {
                write!(f, "product `{id}` has invalid price {price}")
            }
        }
    }
}

impl Error for ProductValidationError {}

impl Product {
    /// Validates the record against cart invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` trims to empty.
    /// - `ZeroQuantity` when `quantity == 0`.
    /// - `InvalidPrice` when `price` is negative or not finite.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.id.trim().is_empty() {
            return Err(ProductValidationError::EmptyId);
        }
        if self.quantity == 0 {
            return Err(ProductValidationError::ZeroQuantity {
                id: self.id.clone(),
            });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ProductValidationError::InvalidPrice {
                id: self.id.clone(),
                price: self.price,
            });
        }
        Ok(())
    }

    /// Line total for this product (`price * quantity`).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

impl From<NewProduct> for Product {
    /// A freshly added line always starts with quantity 1.
    fn from(item: NewProduct) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        }
    }
}
