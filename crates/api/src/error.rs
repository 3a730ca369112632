use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use misarfeh_core::error::CoreError;
use misarfeh_core::validator::FieldErrors;
use misarfeh_db::DbError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for storage errors,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{"error": ..., "code": ...}` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `misarfeh_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `misarfeh_db`.
    #[error(transparent)]
    Database(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route or no record matches the request.
    #[error("Not found")]
    NotFound,

    /// The route exists but does not support the request method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Database errors ---
            AppError::Database(err) => classify_db_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", json!(msg))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", json!(NOT_FOUND_MESSAGE)),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                json!("the method is not supported for this resource"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        json!(INTERNAL_MESSAGE),
    )
}

fn validation(errors: &FieldErrors) -> (StatusCode, &'static str, Value) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_ERROR",
        json!(errors),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, Value) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            json!(format!("{entity} with id {id} not found")),
        ),
        CoreError::Validation(errors) => validation(errors),
        CoreError::EditConflict => (
            StatusCode::CONFLICT,
            "EDIT_CONFLICT",
            json!(err.to_string()),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Constraint violations that are the client's to fix, reported as a
/// field error instead of a conflict.
fn constraint_field_error(constraint: &str) -> Option<FieldErrors> {
    let (field, message) = match constraint {
        "users_phone_key" => ("phone", "a user with this phone number already exists"),
        "products_shop_id_fkey" => ("shop_id", "must reference an existing shop"),
        "comments_product_id_fkey" => ("product_id", "must reference an existing product"),
        _ => return None,
    };
    Some(FieldErrors::single(field, message))
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - Known constraints map to 422 field errors.
/// - Other unique and foreign key violations map to 409.
/// - A stale version maps to 409 `EDIT_CONFLICT`.
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, Value) {
    if let Some(errors) = err.constraint().and_then(constraint_field_error) {
        return validation(&errors);
    }

    match err {
        DbError::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            json!(format!(
                "Duplicate value violates unique constraint: {constraint}"
            )),
        ),
        DbError::ForeignKeyViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            json!(format!(
                "Operation violates foreign key constraint: {constraint}"
            )),
        ),
        DbError::EditConflict => classify_core_error(&CoreError::EditConflict),
        DbError::Core(core) => classify_core_error(core),
        DbError::Sqlx(sqlx::Error::RowNotFound) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", json!(NOT_FOUND_MESSAGE))
        }
        DbError::Inconsistent(_) | DbError::Sqlx(_) => {
            tracing::error!(error = %err, "Database error");
            internal()
        }
    }
}
