//! Request extractors that reject with [`AppError`] so every failure
//! renders as the JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use misarfeh_core::types::DbId;

use crate::error::AppError;

/// JSON body extractor; malformed or mistyped bodies (including unknown
/// fields) are rejected with `400 Bad Request`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// A positive row id taken from the `{id}` path segment.
///
/// Anything that is not an integer of at least 1 is answered with
/// `404 Not Found` before a handler (or the database) is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for ResourceId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        parse_id(&raw).map(ResourceId).ok_or(AppError::NotFound)
    }
}

fn parse_id(raw: &str) -> Option<DbId> {
    raw.parse::<DbId>().ok().filter(|id| *id >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_ids() {
        assert_eq!(parse_id("1"), Some(1));
        assert_eq!(parse_id("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-1", "abc", "", "1.5", "99999999999999999999"] {
            assert_eq!(parse_id(raw), None, "raw={raw:?}");
        }
    }
}
