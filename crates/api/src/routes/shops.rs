use axum::routing::get;
use axum::Router;

use crate::handlers::shops;
use crate::state::AppState;

/// Routes mounted at `/shops`.
///
/// ```text
/// GET    /                   -> list_shops
/// POST   /                   -> create_shop
/// GET    /{id}               -> show_shop
/// PATCH  /{id}               -> update_shop
/// DELETE /{id}               -> delete_shop
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::list_shops).post(shops::create_shop))
        .route(
            "/{id}",
            get(shops::show_shop)
                .patch(shops::update_shop)
                .delete(shops::delete_shop),
        )
}
