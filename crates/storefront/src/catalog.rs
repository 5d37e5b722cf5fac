//! Catalog loading.
//!
//! The storefront ships with `content/catalog.json` compiled in. Setting
//! `STOREFRONT_CATALOG_PATH` serves a different file instead.

use std::path::{Path, PathBuf};

use chinoeffy_core::{Catalog, CatalogError};
use thiserror::Error;

/// The catalog bundled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors loading the catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Invalid { path: PathBuf, source: CatalogError },
}

/// Load the catalog from `path`, or the bundled one when `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or parsed.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return bundled_catalog().map_err(|source| CatalogLoadError::Invalid {
            path: PathBuf::from("<bundled>"),
            source,
        });
    };

    let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&raw).map_err(|source| CatalogLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        products = catalog.products().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Parse the bundled catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the bundled file is invalid.
pub fn bundled_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(BUNDLED_CATALOG)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = bundled_catalog().unwrap();
        assert!(!catalog.products().is_empty());
        assert!(catalog.categories().len() > 1);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Read { .. }));
    }
}
