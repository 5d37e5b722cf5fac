//! ChinoEffy Core - cart store, catalog and shared types.
//!
//! This crate is shared by every ChinoEffy front-end:
//! - `storefront` - Public web store (axum + HTMX)
//! - `cli` - Terminal cart and catalog tools
//!
//! # Architecture
//!
//! The core crate does no network or filesystem I/O. Persistence goes
//! through the [`KeyValueStorage`] trait, which each front-end implements
//! over whatever per-user storage it has.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and quantities
//! - [`product`] - Typed product descriptors and catalog entries
//! - [`cart`] - The cart aggregate and its invariants
//! - [`storage`] - Key-value storage trait and in-memory backend
//! - [`store`] - The persisted, observable cart store
//! - [`catalog`] - Product catalog with category filter and price sort

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod product;
pub mod storage;
pub mod store;
pub mod types;

pub use cart::{AddOutcome, Cart, CartDataError, CartItem};
pub use catalog::{Catalog, CatalogError, CategoryFilter, PriceSort};
pub use product::{Product, ProductCard, ProductCardError, ProductDescriptor};
pub use storage::{CART_STORAGE_KEY, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartEvent, CartObserver, CartStore};
pub use types::*;
