//! Checkout route handlers.
//!
//! Checkout is simulated: after a short processing delay the cart is
//! snapshotted into a [`Receipt`], emptied, and the visitor is sent to the
//! download page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::{PaymentMethod, Receipt, session_keys};
use crate::routes::cart::{CartView, is_htmx};
use crate::services::SessionCart;
use crate::state::AppState;

/// Header htmx reads to perform a full-page client-side redirect.
const HX_REDIRECT_HEADER: &str = "hx-redirect";

/// Where a completed checkout lands.
const DOWNLOAD_PATH: &str = "/download";

/// A selectable payment option.
#[derive(Clone)]
pub struct PaymentOptionView {
    pub value: String,
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Receipt display data for templates.
#[derive(Clone)]
pub struct ReceiptView {
    pub reference: String,
    pub placed_at: String,
    pub email: String,
    pub payment_label: String,
    pub lines: Vec<ReceiptLineView>,
    pub total: String,
}

/// One receipt line for templates.
#[derive(Clone)]
pub struct ReceiptLineView {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        Self {
            reference: receipt.short_reference(),
            placed_at: receipt.placed_at.format("%B %-d, %Y %H:%M UTC").to_string(),
            email: receipt.email.clone(),
            payment_label: receipt.payment_method.label().to_string(),
            lines: receipt
                .lines
                .iter()
                .map(|line| ReceiptLineView {
                    name: line.name.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity.get(),
                    line_total: line.line_total.to_string(),
                })
                .collect(),
            total: receipt.total.to_string(),
        }
    }
}

/// Checkout page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    pub payment: Option<String>,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub payment_method: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub payment_options: Vec<PaymentOptionView>,
    pub selected_payment: String,
}

/// Download page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/download.html")]
pub struct DownloadTemplate {
    pub receipt: Option<ReceiptView>,
}

/// Payment options with exactly one marked active.
fn payment_options(selected: PaymentMethod) -> Vec<PaymentOptionView> {
    PaymentMethod::ALL
        .into_iter()
        .map(|method| PaymentOptionView {
            value: method.to_string(),
            label: method.label().to_string(),
            href: format!("/checkout?payment={method}"),
            active: method == selected,
        })
        .collect()
}

/// Redirect that works for both htmx and plain form posts.
fn redirect(headers: &HeaderMap, to: &'static str) -> Response {
    if is_htmx(headers) {
        ([(HX_REDIRECT_HEADER, HeaderValue::from_static(to))], "").into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Display checkout page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> impl IntoResponse {
    let cart = SessionCart::load(session, &state.config().cart.storage_key).await;
    let selected = PaymentMethod::parse_or_default(query.payment.as_deref().unwrap_or_default());

    CheckoutTemplate {
        cart: CartView::from(cart.cart()),
        payment_options: payment_options(selected),
        selected_payment: selected.to_string(),
    }
}

/// Complete a simulated checkout.
///
/// An empty cart is sent back to `/cart`.
///
/// # Errors
///
/// Returns 500 if the session write fails.
#[instrument(skip(state, session, headers, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let config = &state.config().cart;
    let mut cart = SessionCart::load(session.clone(), &config.storage_key).await;

    if cart.cart().is_empty() {
        return Ok(redirect(&headers, "/cart"));
    }

    tokio::time::sleep(config.checkout_delay).await;

    let payment_method = PaymentMethod::parse_or_default(&form.payment_method);
    let receipt = Receipt::from_cart(cart.cart(), &form.email, payment_method);

    cart.store_mut().clear();
    cart.save().await?;
    session.insert(session_keys::LAST_RECEIPT, &receipt).await?;

    add_breadcrumb("checkout", "Checkout completed", None);
    tracing::info!(
        reference = %receipt.reference,
        payment_method = %receipt.payment_method,
        total = %receipt.total,
        lines = receipt.lines.len(),
        "Checkout completed"
    );

    Ok(redirect(&headers, DOWNLOAD_PATH))
}

/// Display the download page for the last completed checkout.
#[instrument(skip(session))]
pub async fn download(session: Session) -> impl IntoResponse {
    let receipt = match session.get::<Receipt>(session_keys::LAST_RECEIPT).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read receipt from session");
            None
        }
    };

    DownloadTemplate {
        receipt: receipt.as_ref().map(ReceiptView::from),
    }
}
