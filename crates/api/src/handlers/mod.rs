//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers validate input, delegate to the corresponding repository in
//! `misarfeh_db`, and map failures via [`AppError`](crate::error::AppError).

pub mod categories;
pub mod comments;
pub mod health;
pub mod products;
pub mod sellers;
pub mod shops;
pub mod upload;

use misarfeh_core::error::CoreError;
use misarfeh_core::types::DbId;

use crate::error::AppError;

/// 404 for a record that is absent (or vanished mid-request).
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
