//! End-to-end cart flows against the in-process storefront router.
//!
//! Catalog ids used here come from the bundled catalog:
//! 1 = Neon Nights Preset Pack ($19.99), 2 = Minimal Icon Set ($12.00),
//! 4 = Cinematic LUT Bundle ($29.00).

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chinoeffy_integration_tests::TestClient;

async fn badge(client: &mut TestClient) -> String {
    client.htmx_get("/cart/count").await.body
}

// ============================================================================
// Adding
// ============================================================================

#[tokio::test]
async fn test_add_increments_and_notifies() {
    let mut client = TestClient::new();

    let response = client.htmx_post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(response.status, StatusCode::OK);

    let triggers = response.triggers().unwrap();
    assert_eq!(triggers["cart-updated"]["count"], 1);
    assert_eq!(
        triggers["show-toast"]["message"],
        "Neon Nights Preset Pack added to cart!"
    );
    assert!(triggers.get("cart-items-updated").is_none());

    let response = client.htmx_post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(response.triggers().unwrap()["cart-updated"]["count"], 2);

    let items = client.htmx_get("/cart/items").await.body;
    assert!(items.contains("Neon Nights Preset Pack"));
    assert!(items.contains("$39.98"));
}

#[tokio::test]
async fn test_add_unknown_product_is_404() {
    let mut client = TestClient::new();
    let response = client.htmx_post("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(badge(&mut client).await.contains("hidden"));
}

#[tokio::test]
async fn test_plain_post_redirects_to_cart() {
    let mut client = TestClient::new();
    let response = client.post_form("/cart/add", &[("product_id", "2")]).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.header("location"), Some("/cart"));

    let page = client.get("/cart").await;
    assert!(page.body.contains("Minimal Icon Set"));
}

// ============================================================================
// Quantities, removal, clearing
// ============================================================================

#[tokio::test]
async fn test_update_clamps_to_one() {
    let mut client = TestClient::new();
    client.htmx_post("/cart/add", &[("product_id", "4")]).await;

    let response = client
        .htmx_post("/cart/update", &[("product_id", "4"), ("quantity", "3")])
        .await;
    let triggers = response.triggers().unwrap();
    assert_eq!(triggers["cart-updated"]["count"], 3);
    assert!(triggers.get("cart-items-updated").is_some());
    assert!(response.body.contains("$87.00"));

    let response = client
        .htmx_post("/cart/update", &[("product_id", "4"), ("quantity", "0")])
        .await;
    assert_eq!(response.triggers().unwrap()["cart-updated"]["count"], 1);
    assert!(response.body.contains("$29.00"));
}

#[tokio::test]
async fn test_update_unknown_item_changes_nothing() {
    let mut client = TestClient::new();
    client.htmx_post("/cart/add", &[("product_id", "1")]).await;

    let response = client
        .htmx_post("/cart/update", &[("product_id", "2"), ("quantity", "5")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.triggers().is_none());
    assert!(badge(&mut client).await.contains('1'));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let mut client = TestClient::new();
    client.htmx_post("/cart/add", &[("product_id", "1")]).await;
    client.htmx_post("/cart/add", &[("product_id", "2")]).await;

    let response = client.htmx_post("/cart/remove", &[("product_id", "1")]).await;
    assert_eq!(response.triggers().unwrap()["cart-updated"]["count"], 1);
    assert!(!response.body.contains("Neon Nights Preset Pack"));
    assert!(response.body.contains("Minimal Icon Set"));

    let response = client.htmx_post("/cart/clear", &[]).await;
    assert_eq!(response.triggers().unwrap()["cart-updated"]["count"], 0);
    assert!(response.body.contains("Your cart is empty"));
    assert!(badge(&mut client).await.contains("hidden"));
}

#[tokio::test]
async fn test_header_panel_and_cart_page_use_separate_ids() {
    let mut client = TestClient::new();
    client.htmx_post("/cart/add", &[("product_id", "1")]).await;
    client.htmx_post("/cart/add", &[("product_id", "2")]).await;

    let page = client.get("/cart").await.body;
    assert_eq!(page.matches("id=\"cart-items\"").count(), 1);

    // The panel is loaded into the same page, so it must not reuse the page's id
    let panel = client.htmx_get("/cart/items?panel=true").await.body;
    assert!(panel.contains("id=\"cart-panel-items\""));
    assert!(!panel.contains("id=\"cart-items\""));
    assert!(!panel.contains("#cart-items"));

    let response = client
        .htmx_post("/cart/remove", &[("product_id", "1"), ("panel", "true")])
        .await;
    assert!(response.body.contains("id=\"cart-panel-items\""));
    assert!(!response.body.contains("Neon Nights Preset Pack"));

    let response = client
        .htmx_post("/cart/update", &[("product_id", "2"), ("quantity", "2")])
        .await;
    assert!(response.body.contains("id=\"cart-items\""));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let mut alice = TestClient::new();
    let mut bob = alice.fork();

    alice.htmx_post("/cart/add", &[("product_id", "1")]).await;
    bob.htmx_post("/cart/add", &[("product_id", "2")]).await;
    bob.htmx_post("/cart/add", &[("product_id", "2")]).await;

    let alice_cart = alice.get("/cart").await.body;
    assert!(alice_cart.contains("Neon Nights Preset Pack"));
    assert!(!alice_cart.contains("Minimal Icon Set"));

    let bob_cart = bob.get("/cart").await.body;
    assert!(bob_cart.contains("Minimal Icon Set"));
    assert!(!bob_cart.contains("Neon Nights Preset Pack"));

    assert!(alice.htmx_get("/cart/count").await.body.contains('1'));
    assert!(bob.htmx_get("/cart/count").await.body.contains('2'));

    // A third visitor on the same app starts empty
    let mut carol = alice.fork();
    assert!(carol.get("/cart").await.body.contains("Your cart is empty"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_returns_to_cart() {
    let mut client = TestClient::new();
    let response = client
        .post_form("/checkout", &[("email", "buyer@example.com"), ("payment_method", "card")])
        .await;
    assert!(response.status.is_redirection());
    assert_eq!(response.header("location"), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_completes_and_empties_cart() {
    let mut client = TestClient::new();
    client.htmx_post("/cart/add", &[("product_id", "1")]).await;
    client.htmx_post("/cart/add", &[("product_id", "2")]).await;

    let page = client.get("/checkout?payment=paypal").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$31.99"));
    assert!(page.body.contains("value=\"paypal\""));

    let response = client
        .htmx_post(
            "/checkout",
            &[("email", "buyer@example.com"), ("payment_method", "paypal")],
        )
        .await;
    assert_eq!(response.header("hx-redirect"), Some("/download"));

    let download = client.get("/download").await;
    assert!(download.body.contains("Thank you for your purchase!"));
    assert!(download.body.contains("Neon Nights Preset Pack"));
    assert!(download.body.contains("$31.99"));
    assert!(download.body.contains("PayPal"));

    assert!(badge(&mut client).await.contains("hidden"));
}

#[tokio::test]
async fn test_download_without_order() {
    let mut client = TestClient::new();
    let page = client.get("/download").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No recent order"));
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_product_listing_filters_and_sorts() {
    let mut client = TestClient::new();
    let page = client.get("/products?category=presets&sort=price-high").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Neon Nights Preset Pack"));
    assert!(!page.body.contains("Lo-fi Drum Kit"));
}

#[tokio::test]
async fn test_product_detail_tabs() {
    let mut client = TestClient::new();
    let page = client.get("/products/1?tab=details&image=1").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Neon Nights Preset Pack"));
    assert!(page.body.contains("Compatible with Lightroom Classic"));
    assert!(!page.body.contains("moody city photography"));
    assert!(page.body.contains("neon-nights-before-after.jpg\" alt=\"Neon Nights Preset Pack\""));

    let missing = client.get("/products/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_faq_single_open() {
    let mut client = TestClient::new();
    let page = client.get("/faq?open=1").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body.matches("faq-answer").count(), 1);

    let page = client.get("/faq").await;
    assert_eq!(page.body.matches("faq-answer").count(), 0);
}
