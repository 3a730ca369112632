use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload::{self, UPLOAD_BODY_LIMIT};
use crate::state::AppState;

/// Image upload route. Only this route accepts bodies larger than the
/// default limit.
///
/// ```text
/// POST   /upload             -> upload_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload::upload_images).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
    )
}
