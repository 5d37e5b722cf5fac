//! Core types for the ChinoEffy store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price, PriceError};
pub use quantity::{Quantity, ZeroQuantity};
