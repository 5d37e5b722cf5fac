//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! ce-cli catalog list
//! ce-cli catalog list --category audio --sort price-low
//! ```

use std::path::Path;

use chinoeffy_core::{CategoryFilter, PriceSort, Product};

use super::{CommandError, load_catalog};

/// One listing line.
fn format_product(product: &Product) -> String {
    format!(
        "#{:<3} {:<32} {:>9}  [{}]",
        product.id.to_string(),
        product.name,
        product.price.to_string(),
        product.category
    )
}

/// List catalog products, optionally filtered by category and sorted by price.
///
/// # Errors
///
/// Returns `CommandError` if the catalog cannot be loaded.
pub fn list(catalog_path: &Path, category: &str, sort: PriceSort) -> Result<(), CommandError> {
    let catalog = load_catalog(catalog_path)?;
    let filter = CategoryFilter::parse(category);
    let products = catalog.browse(&filter, sort);

    tracing::info!(
        category = filter.as_str(),
        sort = %sort,
        count = products.len(),
        "Catalog"
    );
    for product in products {
        tracing::info!("{}", format_product(product));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chinoeffy_core::{Price, ProductId};

    use super::*;

    #[test]
    fn test_format_product() {
        let product = Product {
            id: ProductId::new(3),
            name: "Lo-fi Drum Kit".to_string(),
            price: Price::from_cents(2450).unwrap(),
            image: String::new(),
            category: "audio".to_string(),
            description: String::new(),
            details: String::new(),
            gallery: Vec::new(),
        };
        let line = format_product(&product);
        assert!(line.starts_with("#3 "));
        assert!(line.contains("$24.50"));
        assert!(line.ends_with("[audio]"));
    }
}
