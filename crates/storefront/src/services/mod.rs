//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart store and HTMX change notifications

pub mod cart;

pub use cart::{HtmxTriggers, SessionCart};
