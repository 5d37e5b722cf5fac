//! Product route handlers.
//!
//! The listing takes `category` and `sort` query parameters; the detail
//! page takes `image` (selected thumbnail) and `tab`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chinoeffy_core::{CategoryFilter, PriceSort, Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub description: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
        }
    }
}

/// A filter tab or sort option link.
#[derive(Clone)]
pub struct OptionView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A product page thumbnail.
#[derive(Clone)]
pub struct ThumbnailView {
    pub url: String,
    pub href: String,
    pub active: bool,
}

/// Detail page tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductTab {
    #[default]
    Description,
    Details,
}

impl ProductTab {
    const ALL: [Self; 2] = [Self::Description, Self::Details];

    /// Parse a query value, falling back to the first tab.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "details" => Self::Details,
            _ => Self::Description,
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Details => "details",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Details => "Details",
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Detail page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub image: Option<usize>,
    pub tab: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub filters: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub main_image: String,
    pub thumbnails: Vec<ThumbnailView>,
    pub tabs: Vec<OptionView>,
    pub tab_content: String,
}

fn listing_href(filter: &CategoryFilter, sort: PriceSort) -> String {
    format!(
        "/products?category={}&sort={sort}",
        urlencoding::encode(filter.as_str())
    )
}

/// Filter tabs ("all" first, then each category) keeping the current sort.
fn filter_options(categories: &[&str], active: &CategoryFilter, sort: PriceSort) -> Vec<OptionView> {
    std::iter::once(CategoryFilter::All)
        .chain(categories.iter().map(|c| CategoryFilter::Category((*c).to_string())))
        .map(|filter| OptionView {
            label: match &filter {
                CategoryFilter::All => "All".to_string(),
                CategoryFilter::Category(category) => category.clone(),
            },
            href: listing_href(&filter, sort),
            active: filter == *active,
        })
        .collect()
}

/// Sort options keeping the current filter.
fn sort_options(filter: &CategoryFilter, active: PriceSort) -> Vec<OptionView> {
    [
        (PriceSort::Featured, "Featured"),
        (PriceSort::PriceLow, "Price: Low to High"),
        (PriceSort::PriceHigh, "Price: High to Low"),
    ]
    .into_iter()
    .map(|(sort, label)| OptionView {
        label: label.to_string(),
        href: listing_href(filter, sort),
        active: sort == active,
    })
    .collect()
}

/// Clamp a requested thumbnail index to the available images.
fn selected_image(requested: Option<usize>, available: usize) -> usize {
    requested.filter(|index| *index < available).unwrap_or(0)
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let filter = CategoryFilter::parse(query.category.as_deref().unwrap_or_default());
    let sort = PriceSort::parse_or_default(query.sort.as_deref().unwrap_or_default());

    let catalog = state.catalog();
    let products = catalog
        .browse(&filter, sort)
        .into_iter()
        .map(ProductView::from)
        .collect();

    ProductsIndexTemplate {
        products,
        filters: filter_options(&catalog.categories(), &filter, sort),
        sorts: sort_options(&filter, sort),
    }
}

/// Display product detail page.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse> {
    let product = state
        .catalog()
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let images = product.images();
    let selected = selected_image(query.image, images.len());
    let tab = ProductTab::parse_or_default(query.tab.as_deref().unwrap_or_default());

    let thumbnails = images
        .iter()
        .enumerate()
        .map(|(index, url)| ThumbnailView {
            url: (*url).to_string(),
            href: format!("/products/{id}?image={index}&tab={}", tab.slug()),
            active: index == selected,
        })
        .collect();

    let tabs = ProductTab::ALL
        .into_iter()
        .map(|t| OptionView {
            label: t.label().to_string(),
            href: format!("/products/{id}?image={selected}&tab={}", t.slug()),
            active: t == tab,
        })
        .collect();

    let tab_content = match tab {
        ProductTab::Description => product.description.clone(),
        ProductTab::Details => product.details.clone(),
    };

    Ok(ProductShowTemplate {
        product: ProductView::from(product),
        main_image: images.get(selected).copied().unwrap_or_default().to_string(),
        thumbnails,
        tabs,
        tab_content,
    })
}
