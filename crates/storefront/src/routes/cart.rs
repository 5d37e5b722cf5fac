//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session (see [`SessionCart`]).
//! Mutations answer with a fragment plus an `HX-Trigger` header describing
//! what changed; plain form posts without HTMX are redirected to `/cart`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use chinoeffy_core::{Cart, CartItem, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::SessionCart;
use crate::state::AppState;

/// Header set by htmx on every request it makes.
const HX_REQUEST_HEADER: &str = "hx-request";

/// Header htmx reads to fire client-side events.
const HX_TRIGGER_HEADER: &str = "hx-trigger";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Quantity the minus control sets, `None` at the floor of 1.
    pub decrement_to: Option<u32>,
    /// Quantity the plus control sets.
    pub increment_to: u32,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity.get(),
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
            decrement_to: item.quantity.decremented().map(|q| q.get()),
            increment_to: item.quantity.incremented().get(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Element id of the item list on the cart page.
pub const PAGE_ITEMS_ID: &str = "cart-items";

/// Element id of the item list in the header cart panel.
pub const PANEL_ITEMS_ID: &str = "cart-panel-items";

/// Which copy of the item list a request renders.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    #[serde(default)]
    pub panel: bool,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub panel: bool,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub panel: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub panel: bool,
    pub container_id: &'static str,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    /// Rendered inside the header panel rather than the cart page.
    pub panel: bool,
    pub container_id: &'static str,
}

impl CartItemsTemplate {
    /// Item list for the page or the panel.
    #[must_use]
    pub fn new(cart: &Cart, panel: bool) -> Self {
        Self {
            cart: CartView::from(cart),
            panel,
            container_id: if panel { PANEL_ITEMS_ID } else { PAGE_ITEMS_ID },
        }
    }
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Whether the request came from htmx.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST_HEADER)
}

/// Build the response to a cart mutation.
fn mutation_response(headers: &HeaderMap, cart: &SessionCart, fragment: impl IntoResponse) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    let mut response = fragment.into_response();
    if let Some(value) = cart
        .trigger_header()
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
    {
        response.headers_mut().insert(HX_TRIGGER_HEADER, value);
    }
    response
}

async fn load_cart(state: &AppState, session: Session) -> SessionCart {
    SessionCart::load(session, &state.config().cart.storage_key).await
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;
    CartShowTemplate {
        cart: CartView::from(cart.cart()),
        panel: false,
        container_id: PAGE_ITEMS_ID,
    }
}

/// Cart panel contents: item rows and total (HTMX).
///
/// `?panel=true` renders the header panel copy under its own element id.
#[instrument(skip(state, session))]
pub async fn items(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ItemsQuery>,
) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;
    CartItemsTemplate::new(cart.cart(), query.panel)
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&state, session).await;
    CartCountTemplate {
        count: cart.cart().item_count(),
    }
}

/// Add one unit of a catalog product to the cart (HTMX).
///
/// Returns the updated count badge; the `HX-Trigger` header carries the
/// confirmation toast.
///
/// # Errors
///
/// Returns 404 for an unknown product id, 500 if the session write fails.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?
        .descriptor();

    let mut cart = load_cart(&state, session).await;
    cart.store_mut().add_item(&product);
    cart.save().await?;

    let product_id = product.id.to_string();
    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let count = cart.cart().item_count();
    Ok(mutation_response(&headers, &cart, CartCountTemplate { count }))
}

/// Update cart item quantity (HTMX).
///
/// Quantities below 1 are stored as 1; unknown ids change nothing.
///
/// # Errors
///
/// Returns 500 if the session write fails.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&state, session).await;
    cart.store_mut()
        .update_quantity(form.product_id, form.quantity);
    cart.save().await?;

    let fragment = CartItemsTemplate::new(cart.cart(), form.panel);
    Ok(mutation_response(&headers, &cart, fragment))
}

/// Remove item from cart (HTMX).
///
/// # Errors
///
/// Returns 500 if the session write fails.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&state, session).await;
    cart.store_mut().remove_item(form.product_id);
    cart.save().await?;

    let fragment = CartItemsTemplate::new(cart.cart(), form.panel);
    Ok(mutation_response(&headers, &cart, fragment))
}

/// Empty the cart (HTMX).
///
/// # Errors
///
/// Returns 500 if the session write fails.
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut cart = load_cart(&state, session).await;
    cart.store_mut().clear();
    cart.save().await?;

    let fragment = CartItemsTemplate::new(cart.cart(), false);
    Ok(mutation_response(&headers, &cart, fragment))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chinoeffy_core::{Price, ProductDescriptor};

    use super::*;

    fn cart_with(quantity: i64) -> Cart {
        let mut cart = Cart::new();
        cart.add(&ProductDescriptor {
            id: ProductId::new(4),
            name: "Cinematic LUT Bundle".to_string(),
            price: Price::from_cents(2900).unwrap(),
            image: "luts.jpg".to_string(),
        });
        cart.update_quantity(ProductId::new(4), quantity);
        cart
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let view = CartView::from(&cart_with(2));
        let item = view.items.first().unwrap();

        assert_eq!(view.total, "$58.00");
        assert_eq!(view.item_count, 2);
        assert_eq!(item.price, "$29.00");
        assert_eq!(item.line_price, "$58.00");
    }

    #[test]
    fn test_quantity_controls_floor_at_one() {
        let view = CartView::from(&cart_with(1));
        let item = view.items.first().unwrap();
        assert_eq!(item.decrement_to, None);
        assert_eq!(item.increment_to, 2);

        let view = CartView::from(&cart_with(3));
        let item = view.items.first().unwrap();
        assert_eq!(item.decrement_to, Some(2));
        assert_eq!(item.increment_to, 4);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_count_badge_hidden_when_zero() {
        let html = CartCountTemplate { count: 0 }.render().unwrap();
        assert!(html.contains("hidden"));

        let html = CartCountTemplate { count: 3 }.render().unwrap();
        assert!(!html.contains("hidden"));
        assert!(html.contains('3'));
    }

    #[test]
    fn test_items_fragment_empty_state() {
        let html = CartItemsTemplate::new(&Cart::new(), false).render().unwrap();
        assert!(html.contains("Your cart is empty"));
    }

    #[test]
    fn test_items_fragment_rows() {
        let html = CartItemsTemplate::new(&cart_with(2), false).render().unwrap();
        assert!(html.contains("Cinematic LUT Bundle"));
        assert!(html.contains("$58.00"));
        assert!(!html.contains("Your cart is empty"));
    }

    #[test]
    fn test_panel_copy_has_its_own_target() {
        let page = CartItemsTemplate::new(&cart_with(2), false).render().unwrap();
        assert!(page.contains("id=\"cart-items\""));
        assert!(page.contains("hx-target=\"#cart-items\""));
        assert!(!page.contains(PANEL_ITEMS_ID));

        let panel = CartItemsTemplate::new(&cart_with(2), true).render().unwrap();
        assert!(panel.contains("id=\"cart-panel-items\""));
        assert!(panel.contains("hx-target=\"#cart-panel-items\""));
        assert!(panel.contains("name=\"panel\" value=\"true\""));
        assert!(!panel.contains("id=\"cart-items\""));
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
