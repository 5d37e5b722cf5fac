//! Product descriptors and catalog entries.
//!
//! The cart never reads presentation markup. Anything that wants to add a
//! product builds a [`ProductDescriptor`] first, either from a catalog
//! [`Product`] or by parsing the raw strings of a [`ProductCard`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, PriceError, ProductId};

/// The typed product handed to the cart store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
}

/// Raw fields of a product card as they appear in page markup.
///
/// Price is `$`-prefixed display text, e.g. `"$19.99"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
}

/// Errors converting a [`ProductCard`] into a [`ProductDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductCardError {
    #[error("invalid product id: {0:?}")]
    InvalidId(String),
    #[error("product name is empty")]
    MissingName,
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),
}

impl TryFrom<ProductCard> for ProductDescriptor {
    type Error = ProductCardError;

    fn try_from(card: ProductCard) -> Result<Self, Self::Error> {
        let id = card
            .id
            .parse::<ProductId>()
            .map_err(|_| ProductCardError::InvalidId(card.id.clone()))?;
        let name = card.name.trim();
        if name.is_empty() {
            return Err(ProductCardError::MissingName);
        }
        let price = card.price.parse::<Price>()?;

        Ok(Self {
            id,
            name: name.to_owned(),
            price,
            image: card.image.trim().to_owned(),
        })
    }
}

/// A product as listed in the store catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Primary image, shown on cards and in the cart.
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Longer "details" tab content.
    #[serde(default)]
    pub details: String,
    /// Extra images for the product page thumbnails.
    #[serde(default)]
    pub gallery: Vec<String>,
}

impl Product {
    /// The descriptor to hand to the cart.
    #[must_use]
    pub fn descriptor(&self) -> ProductDescriptor {
        ProductDescriptor {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    /// Primary image followed by the gallery, without duplicates.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        let mut images = vec![self.image.as_str()];
        for image in &self.gallery {
            if !images.contains(&image.as_str()) {
                images.push(image);
            }
        }
        images
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str, price: &str) -> ProductCard {
        ProductCard {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            image: " /static/img/pack.png ".to_string(),
        }
    }

    #[test]
    fn test_card_to_descriptor() {
        let descriptor = ProductDescriptor::try_from(card("3", " Icon Pack ", "$12.00")).unwrap();
        assert_eq!(descriptor.id, ProductId::new(3));
        assert_eq!(descriptor.name, "Icon Pack");
        assert_eq!(descriptor.price, Price::from_cents(1200).unwrap());
        assert_eq!(descriptor.image, "/static/img/pack.png");
    }

    #[test]
    fn test_card_errors() {
        assert!(matches!(
            ProductDescriptor::try_from(card("x", "A", "$1")),
            Err(ProductCardError::InvalidId(_))
        ));
        assert!(matches!(
            ProductDescriptor::try_from(card("1", "  ", "$1")),
            Err(ProductCardError::MissingName)
        ));
        assert!(matches!(
            ProductDescriptor::try_from(card("1", "A", "one dollar")),
            Err(ProductCardError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_images_deduplicates_primary() {
        let product = Product {
            id: ProductId::new(1),
            name: "Preset".to_string(),
            price: Price::ZERO,
            image: "a.png".to_string(),
            category: "presets".to_string(),
            description: String::new(),
            details: String::new(),
            gallery: vec!["a.png".to_string(), "b.png".to_string()],
        };
        assert_eq!(product.images(), vec!["a.png", "b.png"]);
        assert_eq!(product.descriptor().image, "a.png");
    }
}
