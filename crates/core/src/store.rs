//! The persisted, observable cart store.
//!
//! A [`CartStore`] owns a [`Cart`] and a [`KeyValueStorage`]. It loads the
//! cart once when constructed, writes the whole cart back after every
//! mutation, and then tells each registered [`CartObserver`] what changed.
//!
//! Nothing here returns an error to the caller:
//! - unreadable or malformed stored data loads as an empty cart
//! - a failed write is logged and the in-memory cart keeps the change
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chinoeffy_core::{CartEvent, CartStore, MemoryStorage, Price, ProductDescriptor, ProductId};
//!
//! let mut store = CartStore::load(MemoryStorage::new());
//! store.subscribe(Arc::new(|event: &CartEvent, _cart: &chinoeffy_core::Cart| {
//!     if let Some(message) = event.notification() {
//!         assert_eq!(message, "Lo-fi Pack added to cart!");
//!     }
//! }));
//!
//! store.add_item(&ProductDescriptor {
//!     id: ProductId::new(1),
//!     name: "Lo-fi Pack".to_string(),
//!     price: Price::from_cents(1000).unwrap(),
//!     image: "/static/img/lofi.png".to_string(),
//! });
//! assert_eq!(store.item_count(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::cart::{AddOutcome, Cart, CartItem};
use crate::product::ProductDescriptor;
use crate::storage::{CART_STORAGE_KEY, KeyValueStorage};
use crate::types::{Price, ProductId, Quantity};

/// A change applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded {
        id: ProductId,
        name: String,
        /// Quantity of the line after the add.
        quantity: Quantity,
    },
    ItemRemoved {
        id: ProductId,
        /// False when no line matched.
        existed: bool,
    },
    QuantityUpdated {
        id: ProductId,
        quantity: Quantity,
    },
    Cleared,
}

impl CartEvent {
    /// Confirmation text to flash to the user, if this event warrants one.
    #[must_use]
    pub fn notification(&self) -> Option<String> {
        match self {
            Self::ItemAdded { name, .. } => Some(format!("{name} added to cart!")),
            _ => None,
        }
    }

    /// Whether the rendered item list should be redrawn.
    ///
    /// Every event refreshes the item count; only removals and quantity
    /// changes redraw the list itself.
    #[must_use]
    pub const fn refreshes_items(&self) -> bool {
        matches!(self, Self::ItemRemoved { .. } | Self::QuantityUpdated { .. })
    }
}

/// Receives cart changes after they have been persisted.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self, event: &CartEvent, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: Fn(&CartEvent, &Cart) + Send + Sync,
{
    fn cart_changed(&self, event: &CartEvent, cart: &Cart) {
        self(event, cart);
    }
}

/// Cart state backed by key-value storage.
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
    observers: Vec<Arc<dyn CartObserver>>,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Load the cart stored under [`CART_STORAGE_KEY`].
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, CART_STORAGE_KEY)
    }

    /// Load the cart stored under `key`.
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match storage.get_item(&key) {
            Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable stored cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cart storage read failed");
                Cart::new()
            }
        };

        Self {
            storage,
            key,
            cart,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) {
        self.observers.push(observer);
    }

    /// Add one unit of `product` and flash a confirmation.
    pub fn add_item(&mut self, product: &ProductDescriptor) {
        let quantity = match self.cart.add(product) {
            AddOutcome::Inserted => Quantity::ONE,
            AddOutcome::Incremented(quantity) => quantity,
        };
        tracing::debug!(product_id = %product.id, quantity = %quantity, "Added item to cart");

        self.commit(&CartEvent::ItemAdded {
            id: product.id,
            name: product.name.clone(),
            quantity,
        });
    }

    /// Remove the line for `id`. Unknown ids leave the cart unchanged.
    pub fn remove_item(&mut self, id: ProductId) {
        let existed = self.cart.remove(id).is_some();
        tracing::debug!(product_id = %id, existed, "Removed item from cart");

        self.commit(&CartEvent::ItemRemoved { id, existed });
    }

    /// Set the quantity for `id`, clamped to at least 1.
    ///
    /// Does nothing (no write, no notification) when no line matches.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        let Some(quantity) = self.cart.update_quantity(id, quantity) else {
            tracing::debug!(product_id = %id, "Quantity update for item not in cart");
            return;
        };

        self.commit(&CartEvent::QuantityUpdated { id, quantity });
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.commit(&CartEvent::Cleared);
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Current lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage, e.g. to flush a snapshot elsewhere.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, event: &CartEvent) {
        self.persist();
        for observer in &self.observers {
            observer.cart_changed(event, &self.cart);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.set_item(&self.key, &self.cart.to_json()) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
