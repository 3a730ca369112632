//! Handlers for the `/v1/shops` resource.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use misarfeh_core::validator::Validator;
use misarfeh_db::models::shop::{Shop, ShopInput, ShopListFilter, UpdateShop};
use misarfeh_db::repositories::shop_repo::SORT_SAFELIST;
use misarfeh_db::repositories::ShopRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, ResourceId};
use crate::handlers::not_found;
use crate::query::QueryParams;
use crate::response::{created, deleted, Envelope, ListEnvelope};
use crate::state::AppState;

/// POST /v1/shops
///
/// Countries and categories are looked up by name and created on first
/// use; everything is written in one transaction.
pub async fn create_shop(
    State(state): State<AppState>,
    AppJson(input): AppJson<ShopInput>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let shop = ShopRepo::create(&state.pool, &input).await?;

    tracing::info!(shop_id = shop.id, title = %shop.title, "Shop created");

    Ok(created(
        format!("/v1/shops/{}", shop.id),
        Envelope::new("shop", shop),
    ))
}

/// GET /v1/shops/{id}
pub async fn show_shop(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<Shop>>> {
    let shop = ShopRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shop", id))?;

    Ok(Json(Envelope::new("shop", shop)))
}

/// GET /v1/shops
///
/// Query parameters: `title`, `instagram` (substring), `countries`,
/// `categories` (comma-separated, any match), `verified`, `page`,
/// `page_size`, `sort`.
pub async fn list_shops(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<ListEnvelope<Shop>>> {
    let mut v = Validator::new();
    let filter = ShopListFilter {
        title: params.string("title", ""),
        instagram: params.string("instagram", ""),
        countries: params.csv("countries"),
        categories: params.csv("categories"),
        verified: params.bool("verified", false, &mut v),
    };
    let filters = params.filters(SORT_SAFELIST, &mut v);
    filters.validate(&mut v);
    v.finish()?;

    let page = ShopRepo::list(&state.pool, &filter, &filters).await?;

    Ok(Json(ListEnvelope::new("shops", page)))
}

/// PATCH /v1/shops/{id}
///
/// Only supplied fields change. Supplying `countries`, `categories`, or
/// `img_urls` replaces that whole collection.
pub async fn update_shop(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    AppJson(patch): AppJson<UpdateShop>,
) -> AppResult<Json<Envelope<Shop>>> {
    let shop = ShopRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shop", id))?;

    let mut input = ShopInput::from(&shop);
    patch.apply_to(&mut input);

    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let shop = ShopRepo::update(&state.pool, id, &input, patch.replacements())
        .await?
        .ok_or_else(|| not_found("Shop", id))?;

    tracing::info!(shop_id = id, "Shop updated");

    Ok(Json(Envelope::new("shop", shop)))
}

/// DELETE /v1/shops/{id}
///
/// Removes the shop together with its links, images, and products.
pub async fn delete_shop(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<String>>> {
    if !ShopRepo::delete(&state.pool, id).await? {
        return Err(not_found("Shop", id));
    }

    tracing::info!(shop_id = id, "Shop deleted");

    Ok(deleted("shop"))
}
