//! Session keys.
//!
//! The cart itself is stored under the configured cart storage key
//! (`chinoeffy_cart` by default), see [`crate::config::CartConfig`].

/// Session keys for non-cart data.
pub mod keys {
    /// Key for the receipt of the most recent simulated checkout.
    pub const LAST_RECEIPT: &str = "last_receipt";
}
