//! Integration tests for `ChinoEffy`.
//!
//! The storefront router is driven in-process with `tower::ServiceExt`,
//! so no server, port or browser is needed:
//!
//! ```bash
//! cargo test -p chinoeffy-integration-tests
//! ```
//!
//! [`TestClient`] keeps the session cookie between requests the way a
//! browser would, which is what ties a visitor to their cart.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chinoeffy_storefront::{
    app, catalog::bundled_catalog, config::StorefrontConfig, state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// A response with its body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `HX-Trigger` header parsed as JSON.
    #[must_use]
    pub fn triggers(&self) -> Option<Value> {
        self.header("hx-trigger")
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// In-process client with a cookie jar of one session cookie.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Client against the bundled catalog with no checkout delay.
    ///
    /// # Panics
    ///
    /// Panics if the bundled catalog is invalid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let mut config = StorefrontConfig::default();
        config.cart.checkout_delay = Duration::ZERO;
        let catalog = bundled_catalog().expect("bundled catalog parses");
        Self {
            app: app(AppState::new(config, catalog)),
            cookie: None,
        }
    }

    /// Another visitor of the same running app: shares the router and its
    /// session store, starts without a cookie.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Plain GET.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// GET as htmx would send it.
    pub async fn htmx_get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).header("hx-request", "true"), Body::empty())
            .await
    }

    /// Form POST without htmx.
    pub async fn post_form(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(encode_form(form))).await
    }

    /// Form POST as htmx would send it.
    pub async fn htmx_post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        self.send(request, Body::from(encode_form(form))).await
    }

    #[allow(clippy::expect_used)]
    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        self.remember_cookie(&response);
        collect(response).await
    }

    fn remember_cookie(&mut self, response: &Response<Body>) {
        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)]
async fn collect(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
