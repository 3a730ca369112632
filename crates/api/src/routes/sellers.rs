use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sellers;
use crate::state::AppState;

/// Routes mounted at `/sellers`.
///
/// ```text
/// POST   /                   -> register_seller
/// GET    /{id}               -> show_seller
/// PATCH  /{id}               -> update_seller
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sellers::register_seller))
        .route(
            "/{id}",
            get(sellers::show_seller).patch(sellers::update_seller),
        )
}
