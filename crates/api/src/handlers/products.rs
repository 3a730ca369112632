//! Handlers for the `/v1/products` resource.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use misarfeh_core::validator::Validator;
use misarfeh_db::models::product::{Product, ProductInput, ProductListFilter, UpdateProduct};
use misarfeh_db::repositories::product_repo::SORT_SAFELIST;
use misarfeh_db::repositories::ProductRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, ResourceId};
use crate::handlers::not_found;
use crate::query::QueryParams;
use crate::response::{created, deleted, Envelope, ListEnvelope};
use crate::state::AppState;

/// POST /v1/products
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<ProductInput>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let product = ProductRepo::create(&state.pool, &input).await?;

    tracing::info!(
        product_id = product.id,
        shop_id = ?product.shop_id,
        "Product created"
    );

    Ok(created(
        format!("/v1/products/{}", product.id),
        Envelope::new("product", product),
    ))
}

/// GET /v1/products/{id}
pub async fn show_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Product", id))?;

    Ok(Json(Envelope::new("product", product)))
}

/// GET /v1/products
///
/// Query parameters: `name`, `brand` (substring), `category`, `country`
/// (exact name), `shop_id`, `page`, `page_size`, `sort`.
pub async fn list_products(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<ListEnvelope<Product>>> {
    let mut v = Validator::new();
    let filter = ProductListFilter {
        name: params.string("name", ""),
        brand: params.string("brand", ""),
        category: params.string("category", ""),
        country: params.string("country", ""),
        shop_id: params.optional_int("shop_id", &mut v),
    };
    let filters = params.filters(SORT_SAFELIST, &mut v);
    filters.validate(&mut v);
    v.finish()?;

    let page = ProductRepo::list(&state.pool, &filter, &filters).await?;

    Ok(Json(ListEnvelope::new("products", page)))
}

/// PATCH /v1/products/{id}
///
/// Only supplied fields change. Supplying `img_urls` replaces the image set.
pub async fn update_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    AppJson(patch): AppJson<UpdateProduct>,
) -> AppResult<Json<Envelope<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Product", id))?;

    let mut input = ProductInput::from(&product);
    patch.apply_to(&mut input);

    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let product = ProductRepo::update(&state.pool, id, &input, patch.replaces_images())
        .await?
        .ok_or_else(|| not_found("Product", id))?;

    tracing::info!(product_id = id, "Product updated");

    Ok(Json(Envelope::new("product", product)))
}

/// DELETE /v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<String>>> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(not_found("Product", id));
    }

    tracing::info!(product_id = id, "Product deleted");

    Ok(deleted("product"))
}
