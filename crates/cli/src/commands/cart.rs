//! Cart commands.
//!
//! Every command loads the cart from [`FileStorage`], applies one
//! operation through [`CartStore`], and lets the store write it back.
//!
//! # Usage
//!
//! ```bash
//! # Add a catalog product
//! ce-cli cart add --id 3
//!
//! # Add a product described on the command line
//! ce-cli cart add --id 42 --name "Grain Overlays" --price '$7.50' --image /img/grain.jpg
//!
//! ce-cli cart update --id 3 --quantity 4
//! ce-cli cart remove --id 3
//! ce-cli cart show
//! ce-cli cart clear
//! ```

use std::path::Path;
use std::sync::Arc;

use chinoeffy_core::{
    Cart, CartEvent, CartStore, KeyValueStorage, ProductCard, ProductDescriptor, ProductId,
};

use super::{CommandError, load_catalog};
use crate::file_storage::FileStorage;

/// Product fields supplied on the command line instead of the catalog.
#[derive(Debug, Default, Clone)]
pub struct ProductArgs {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

/// Open the cart in `data_dir` with an observer that logs each change.
fn open_store(data_dir: &Path) -> CartStore<FileStorage> {
    let mut store = CartStore::load(FileStorage::new(data_dir));
    store.subscribe(Arc::new(|event: &CartEvent, cart: &Cart| {
        if let Some(message) = event.notification() {
            tracing::info!("{message}");
        }
        tracing::debug!(?event, items = cart.item_count(), "Cart changed");
    }));
    store
}

/// Resolve the product to add: explicit fields win, otherwise the catalog.
fn resolve_product(
    id: ProductId,
    args: ProductArgs,
    catalog_path: &Path,
) -> Result<ProductDescriptor, CommandError> {
    match (args.name, args.price) {
        (Some(name), Some(price)) => Ok(ProductDescriptor::try_from(ProductCard {
            id: id.to_string(),
            name,
            price,
            image: args.image.unwrap_or_default(),
        })?),
        _ => load_catalog(catalog_path)?
            .find(id)
            .map(chinoeffy_core::Product::descriptor)
            .ok_or(CommandError::UnknownProduct(id)),
    }
}

/// Render the cart as display lines.
fn format_cart(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "#{:<3} {:<32} {:>3} x {:>9} = {:>9}",
                item.id.to_string(),
                item.name,
                item.quantity.get(),
                item.price.to_string(),
                item.line_total().to_string()
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), total {}",
        cart.item_count(),
        cart.total()
    ));
    lines
}

fn log_cart<S: KeyValueStorage>(store: &CartStore<S>) {
    for line in format_cart(store.cart()) {
        tracing::info!("{line}");
    }
}

/// Print the cart.
pub fn show(data_dir: &Path) {
    log_cart(&open_store(data_dir));
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CommandError` if the product cannot be resolved.
pub fn add(
    data_dir: &Path,
    catalog_path: &Path,
    id: ProductId,
    args: ProductArgs,
) -> Result<(), CommandError> {
    let product = resolve_product(id, args, catalog_path)?;
    let mut store = open_store(data_dir);
    store.add_item(&product);
    log_cart(&store);
    Ok(())
}

/// Remove a line.
pub fn remove(data_dir: &Path, id: ProductId) {
    let mut store = open_store(data_dir);
    if store.cart().get(id).is_none() {
        tracing::warn!(%id, "Product is not in the cart");
    }
    store.remove_item(id);
    log_cart(&store);
}

/// Set a line's quantity; values below 1 become 1.
pub fn update(data_dir: &Path, id: ProductId, quantity: i64) {
    let mut store = open_store(data_dir);
    if store.cart().get(id).is_none() {
        tracing::warn!(%id, "Product is not in the cart");
        return;
    }
    store.update_quantity(id, quantity);
    log_cart(&store);
}

/// Empty the cart.
pub fn clear(data_dir: &Path) {
    let mut store = open_store(data_dir);
    store.clear();
    tracing::info!("Cart cleared");
}
