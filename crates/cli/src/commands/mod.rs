//! CLI subcommands.

pub mod cart;
pub mod catalog;

use std::path::Path;

use chinoeffy_core::{Catalog, CatalogError, ProductCardError, ProductId};
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        source: std::io::Error,
    },

    /// Catalog file is not a valid catalog.
    #[error("Invalid catalog: {0}")]
    CatalogInvalid(#[from] CatalogError),

    /// No catalog product has this id.
    #[error("No product with id {0} in the catalog")]
    UnknownProduct(ProductId),

    /// Product given on the command line is invalid.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductCardError),
}

/// Load a catalog file.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CommandError::CatalogRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Catalog::from_json(&raw)?)
}
