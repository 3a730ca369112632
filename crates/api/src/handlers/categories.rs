//! Handlers for the `/v1/product/categories` resource.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use misarfeh_core::error::CoreError;
use misarfeh_core::validator::{FieldErrors, Validator};
use misarfeh_db::models::category::{Category, CreateCategory, UpdateCategory};
use misarfeh_db::repositories::category_repo::SORT_SAFELIST;
use misarfeh_db::repositories::CategoryRepo;
use misarfeh_db::DbError;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, ResourceId};
use crate::handlers::not_found;
use crate::query::QueryParams;
use crate::response::{created, deleted, Envelope, ListEnvelope};
use crate::state::AppState;

const NAME_KEY: &str = "categories_name_key";
const NAME_TAKEN: &str = "a category with this name already exists";

/// A name collision on a category write is reported against `name`.
///
/// Shop and product writes hit the same constraint only when racing another
/// get-or-insert, and keep the generic conflict mapping.
fn name_taken(err: DbError) -> AppError {
    match err {
        DbError::UniqueViolation { constraint } if constraint == NAME_KEY => {
            CoreError::Validation(FieldErrors::single("name", NAME_TAKEN)).into()
        }
        other => other.into(),
    }
}

/// POST /v1/product/categories
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let category = CategoryRepo::create(&state.pool, &input)
        .await
        .map_err(name_taken)?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(created(
        format!("/v1/product/categories/{}", category.id),
        Envelope::new("category", category),
    ))
}

/// GET /v1/product/categories/{id}
pub async fn show_category(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Category", id))?;

    Ok(Json(Envelope::new("category", category)))
}

/// GET /v1/product/categories
///
/// Query parameters: `name` (exact), `page`, `page_size`, `sort`.
pub async fn list_categories(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<ListEnvelope<Category>>> {
    let mut v = Validator::new();
    let name = params.string("name", "");
    let filters = params.filters(SORT_SAFELIST, &mut v);
    filters.validate(&mut v);
    v.finish()?;

    let page = CategoryRepo::list(&state.pool, &name, &filters).await?;

    Ok(Json(ListEnvelope::new("categories", page)))
}

/// PUT /v1/product/categories/{id}
///
/// Partial update: only supplied fields change.
pub async fn update_category(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    AppJson(patch): AppJson<UpdateCategory>,
) -> AppResult<Json<Envelope<Category>>> {
    let mut category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Category", id))?;

    patch.apply_to(&mut category);

    let mut v = Validator::new();
    category.validate(&mut v);
    v.finish()?;

    let category = CategoryRepo::update(&state.pool, &category)
        .await
        .map_err(name_taken)?
        .ok_or_else(|| not_found("Category", id))?;

    tracing::info!(category_id = id, "Category updated");

    Ok(Json(Envelope::new("category", category)))
}

/// DELETE /v1/product/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<String>>> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found("Category", id));
    }

    tracing::info!(category_id = id, "Category deleted");

    Ok(deleted("category"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn duplicate_name_becomes_field_error() {
        let err = name_taken(DbError::UniqueViolation {
            constraint: NAME_KEY.into(),
        });
        assert_matches!(err, AppError::Core(CoreError::Validation(errors)) => {
            assert_eq!(
                errors.get("name"),
                Some("a category with this name already exists")
            );
        });
    }

    #[test]
    fn other_constraints_pass_through() {
        let err = name_taken(DbError::UniqueViolation {
            constraint: "countries_name_key".into(),
        });
        assert_matches!(err, AppError::Database(DbError::UniqueViolation { .. }));
    }
}
