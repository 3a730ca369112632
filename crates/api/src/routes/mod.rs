pub mod categories;
pub mod comments;
pub mod health;
pub mod products;
pub mod sellers;
pub mod shops;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthcheck                       service and database health
///
/// /upload                            image upload (POST, multipart)
/// /images/{*path}                    uploaded images (static, see router.rs)
///
/// /shops                             list, create
/// /shops/{id}                        show, update (PATCH), delete
///
/// /products                          list, create
/// /products/{id}                     show, update (PATCH), delete
///
/// /product/categories                list, create
/// /product/categories/{id}           show, update (PUT), delete
///
/// /product/comments                  list, create
/// /product/comments/{id}             show, update (PUT), delete
///
/// /sellers                           register
/// /sellers/{id}                      show, update (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .nest("/shops", shops::router())
        .nest("/products", products::router())
        .nest("/product/categories", categories::router())
        .nest("/product/comments", comments::router())
        .nest("/sellers", sellers::router())
}
