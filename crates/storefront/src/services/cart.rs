//! Session-backed cart.
//!
//! The session plays the part of browser local storage. On each request
//! the stored cart string is copied into a [`MemoryStorage`] snapshot, a
//! [`CartStore`] runs the operation against it, and [`SessionCart::save`]
//! writes the snapshot back. Render side effects are not called inline:
//! an [`HtmxTriggers`] observer turns cart events into an `HX-Trigger`
//! header so the page refreshes its own count badge, item list and toast.

use std::sync::{Arc, Mutex, PoisonError};

use chinoeffy_core::{Cart, CartEvent, CartObserver, CartStore, MemoryStorage};
use serde_json::{Map, Value, json};
use tower_sessions::Session;

/// HTMX event fired whenever the item count may have changed.
pub const CART_UPDATED_EVENT: &str = "cart-updated";
/// HTMX event fired when the rendered item list must be redrawn.
pub const CART_ITEMS_UPDATED_EVENT: &str = "cart-items-updated";
/// HTMX event carrying a transient confirmation message.
pub const SHOW_TOAST_EVENT: &str = "show-toast";

/// Collects cart events for one response.
#[derive(Debug, Default)]
pub struct HtmxTriggers {
    state: Mutex<TriggerState>,
}

#[derive(Debug, Default)]
struct TriggerState {
    count: Option<u64>,
    refresh_items: bool,
    toast: Option<String>,
}

impl CartObserver for HtmxTriggers {
    fn cart_changed(&self, event: &CartEvent, cart: &Cart) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.count = Some(cart.item_count());
        state.refresh_items |= event.refreshes_items();
        if let Some(message) = event.notification() {
            state.toast = Some(message);
        }
    }
}

impl HtmxTriggers {
    /// Whether any change was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
            .is_none()
    }

    /// JSON value for the `HX-Trigger` response header, if anything changed.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let count = state.count?;

        let mut events = Map::new();
        events.insert(CART_UPDATED_EVENT.to_string(), json!({ "count": count }));
        if state.refresh_items {
            events.insert(CART_ITEMS_UPDATED_EVENT.to_string(), Value::Null);
        }
        if let Some(message) = &state.toast {
            events.insert(SHOW_TOAST_EVENT.to_string(), json!({ "message": message }));
        }
        Some(Value::Object(events).to_string())
    }
}

/// The current visitor's cart for the duration of one request.
pub struct SessionCart {
    session: Session,
    store: CartStore<MemoryStorage>,
    triggers: Arc<HtmxTriggers>,
}

impl SessionCart {
    /// Load the cart stored in `session` under `key`.
    ///
    /// Session read failures are logged and yield an empty cart.
    pub async fn load(session: Session, key: &str) -> Self {
        let storage = match session.get::<String>(key).await {
            Ok(Some(raw)) => MemoryStorage::with_item(key, raw),
            Ok(None) => MemoryStorage::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from session");
                MemoryStorage::new()
            }
        };

        let mut store = CartStore::load_with_key(storage, key);
        let triggers = Arc::new(HtmxTriggers::default());
        store.subscribe(triggers.clone());

        Self {
            session,
            store,
            triggers,
        }
    }

    /// The cart store.
    #[must_use]
    pub const fn store(&self) -> &CartStore<MemoryStorage> {
        &self.store
    }

    /// The cart store, for mutation.
    pub const fn store_mut(&mut self) -> &mut CartStore<MemoryStorage> {
        &mut self.store
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.store.cart()
    }

    /// The `HX-Trigger` header value describing this request's changes.
    #[must_use]
    pub fn trigger_header(&self) -> Option<String> {
        self.triggers.header_value()
    }

    /// Write the cart back to the session if it changed.
    ///
    /// # Errors
    ///
    /// Returns the session error if the session store rejects the write.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        if self.triggers.is_empty() {
            return Ok(());
        }
        if let Some(raw) = self.store.storage().peek(self.store.key()) {
            self.session.insert(self.store.key(), raw).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chinoeffy_core::{Price, ProductDescriptor, ProductId};

    use super::*;

    fn product() -> ProductDescriptor {
        ProductDescriptor {
            id: ProductId::new(1),
            name: "Icon Set".to_string(),
            price: Price::from_cents(1200).unwrap(),
            image: "icons.png".to_string(),
        }
    }

    fn header_json(triggers: &HtmxTriggers) -> Value {
        serde_json::from_str(&triggers.header_value().unwrap()).unwrap()
    }

    #[test]
    fn test_no_changes_no_header() {
        let triggers = HtmxTriggers::default();
        assert!(triggers.is_empty());
        assert!(triggers.header_value().is_none());
    }

    #[test]
    fn test_add_sets_count_and_toast() {
        let triggers = Arc::new(HtmxTriggers::default());
        let mut store = CartStore::load(MemoryStorage::new());
        store.subscribe(triggers.clone());
        store.add_item(&product());
        store.add_item(&product());

        let header = header_json(&triggers);
        assert_eq!(header[CART_UPDATED_EVENT]["count"], 2);
        assert_eq!(header[SHOW_TOAST_EVENT]["message"], "Icon Set added to cart!");
        assert!(header.get(CART_ITEMS_UPDATED_EVENT).is_none());
    }

    #[test]
    fn test_update_requests_item_refresh() {
        let triggers = Arc::new(HtmxTriggers::default());
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_item(&product());
        store.subscribe(triggers.clone());
        store.update_quantity(ProductId::new(1), 3);

        let header = header_json(&triggers);
        assert_eq!(header[CART_UPDATED_EVENT]["count"], 3);
        assert!(header.get(CART_ITEMS_UPDATED_EVENT).is_some());
        assert!(header.get(SHOW_TOAST_EVENT).is_none());
    }
}
