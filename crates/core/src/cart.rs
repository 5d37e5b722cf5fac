//! The cart aggregate.
//!
//! `Cart` is an ordered list of line items, at most one per product id.
//! It knows nothing about storage or rendering; see [`crate::store`] for
//! the persisted, observable wrapper.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::ProductDescriptor;
use crate::types::{Price, ProductId, Quantity};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: Quantity,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity.get()
    }
}

/// What `Cart::add` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Inserted,
    /// An existing line went up by one.
    Incremented(Quantity),
}

/// Stored data that violates the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartDataError {
    #[error("malformed cart data: {0}")]
    Malformed(String),
    #[error("duplicate cart line for product {0}")]
    DuplicateId(ProductId),
}

/// Ordered cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CartDataError::DuplicateId`] if two lines share an id.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartDataError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CartDataError::DuplicateId(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Parse the serialized form (a JSON array of lines).
    ///
    /// # Errors
    ///
    /// Returns [`CartDataError`] if the JSON is invalid, a line breaks a
    /// field constraint (zero quantity, negative price) or ids repeat.
    pub fn from_json(raw: &str) -> Result<Self, CartDataError> {
        let items: Vec<CartItem> =
            serde_json::from_str(raw).map_err(|e| CartDataError::Malformed(e.to_string()))?;
        Self::from_items(items)
    }

    /// Serialize to the stored form.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A Vec of plain structs with string keys cannot fail to serialize.
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string())
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line always goes up by exactly one; otherwise a new line
    /// is appended with quantity 1.
    pub fn add(&mut self, product: &ProductDescriptor) -> AddOutcome {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.incremented();
            return AddOutcome::Incremented(item.quantity);
        }

        self.items.push(CartItem {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: Quantity::ONE,
        });
        AddOutcome::Inserted
    }

    /// Remove the line for `id`, returning it if it existed.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity for `id`, clamped to at least 1.
    ///
    /// Returns the stored quantity, or `None` if no line matches.
    pub fn update_quantity(&mut self, id: ProductId, requested: i64) -> Option<Quantity> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.quantity = Quantity::clamped(requested);
        Some(item.quantity)
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
