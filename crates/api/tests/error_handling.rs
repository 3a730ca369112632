//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use misarfeh_api::error::AppError;
use misarfeh_core::dedup::DuplicateName;
use misarfeh_core::error::CoreError;
use misarfeh_core::validator::FieldErrors;
use misarfeh_db::DbError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn unique(constraint: &str) -> AppError {
    AppError::Database(DbError::UniqueViolation {
        constraint: constraint.into(),
    })
}

fn foreign_key(constraint: &str) -> AppError {
    AppError::Database(DbError::ForeignKeyViolation {
        constraint: constraint.into(),
    })
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Shop",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Shop with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_field_map() {
    let err = AppError::Core(CoreError::Validation(FieldErrors::single(
        "title",
        "must be provided",
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"],
        serde_json::json!({"title": "must be provided"})
    );
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad body".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad body");
}

#[tokio::test]
async fn duplicate_phone_is_a_phone_field_error() {
    let (status, json) = error_to_response(unique("users_phone_key")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json["error"]["phone"],
        "a user with this phone number already exists"
    );
    assert!(json["error"].get("email").is_none());
}

#[tokio::test]
async fn category_name_race_returns_409() {
    let (status, json) = error_to_response(unique("categories_name_key")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].get("name").is_none());
}

#[tokio::test]
async fn unmapped_unique_violation_returns_409() {
    let (status, json) = error_to_response(unique("countries_name_key")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn missing_parent_shop_is_a_field_error() {
    let (status, json) = error_to_response(foreign_key("products_shop_id_fkey")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["shop_id"], "must reference an existing shop");
}

#[tokio::test]
async fn unmapped_foreign_key_violation_returns_409() {
    let (status, json) = error_to_response(foreign_key("products_category_id_fkey")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn edit_conflict_returns_409() {
    let (status, json) = error_to_response(AppError::Database(DbError::EditConflict)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "EDIT_CONFLICT");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let err = AppError::Database(DbError::Sqlx(sqlx::Error::RowNotFound));

    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inconsistent_names_are_sanitized_500() {
    let err = AppError::Database(DbError::Inconsistent(DuplicateName {
        entity: "country",
        name: "Iran".into(),
        count: 2,
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let err = AppError::InternalError("disk exploded at /var/secret".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[test]
fn domain_and_storage_errors_convert() {
    assert_matches!(
        AppError::from(CoreError::EditConflict),
        AppError::Core(CoreError::EditConflict)
    );
    assert_matches!(
        AppError::from(DbError::EditConflict),
        AppError::Database(DbError::EditConflict)
    );
}
