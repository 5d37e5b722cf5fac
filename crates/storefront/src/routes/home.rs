//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::routes::products::ProductView;
use crate::state::AppState;

/// Number of products shown in the featured grid.
const FEATURED_LIMIT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductView>,
}

/// Display home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state
        .catalog()
        .products()
        .iter()
        .take(FEATURED_LIMIT)
        .map(ProductView::from)
        .collect();

    HomeTemplate { featured }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::bundled_catalog;

    #[test]
    fn test_home_renders_add_to_cart_forms() {
        let catalog = bundled_catalog().unwrap();
        let featured: Vec<ProductView> = catalog
            .products()
            .iter()
            .take(FEATURED_LIMIT)
            .map(ProductView::from)
            .collect();
        let first = featured.first().unwrap().name.clone();

        let html = HomeTemplate { featured }.render().unwrap();
        assert!(html.contains(&first));
        assert!(html.contains("hx-post=\"/cart/add\""));
    }
}
