//! Static content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

/// Questions and answers on the FAQ page.
const FAQ_ENTRIES: &[(&str, &str)] = &[
    (
        "How do I receive my files?",
        "Right after checkout you land on the download page with links to every file in your order.",
    ),
    (
        "Which software are the presets made for?",
        "Presets ship for Lightroom Classic and Lightroom mobile. LUTs are standard .cube files.",
    ),
    (
        "Can I use the assets in commercial work?",
        "Yes. Every purchase includes a commercial license for client and personal projects.",
    ),
    (
        "Do you offer refunds?",
        "Because products are digital downloads, sales are final. Contact us if a file is broken.",
    ),
    (
        "Which payment methods are accepted?",
        "Cards, PayPal and cryptocurrency.",
    ),
];

/// One accordion entry.
#[derive(Clone)]
pub struct FaqItemView {
    pub question: String,
    pub answer: String,
    pub open: bool,
    /// Link that toggles this entry.
    pub href: String,
}

/// FAQ query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub open: Option<usize>,
}

/// FAQ page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/faq.html")]
pub struct FaqTemplate {
    pub items: Vec<FaqItemView>,
}

/// The entry left open after clicking `index`: clicking the open entry
/// closes it, clicking any other opens it and closes the rest.
fn toggle_target(open: Option<usize>, index: usize) -> Option<usize> {
    if open == Some(index) { None } else { Some(index) }
}

fn faq_items(open: Option<usize>) -> Vec<FaqItemView> {
    FAQ_ENTRIES
        .iter()
        .enumerate()
        .map(|(index, (question, answer))| FaqItemView {
            question: (*question).to_string(),
            answer: (*answer).to_string(),
            open: open == Some(index),
            href: toggle_target(open, index)
                .map_or_else(|| "/faq".to_string(), |target| format!("/faq?open={target}")),
        })
        .collect()
}

/// Display FAQ page.
#[instrument]
pub async fn faq(Query(query): Query<FaqQuery>) -> impl IntoResponse {
    FaqTemplate {
        items: faq_items(query.open),
    }
}
