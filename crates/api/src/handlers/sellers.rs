//! Handlers for the `/v1/sellers` resource.
//!
//! A seller is a user account plus seller details. Passwords are hashed
//! with Argon2id on the blocking pool before anything is written.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use misarfeh_core::validator::Validator;
use misarfeh_db::models::seller::{RegisterSeller, SellerProfile, UpdateSeller};
use misarfeh_db::models::user::NewUser;
use misarfeh_db::repositories::SellerRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, ResourceId};
use crate::handlers::not_found;
use crate::password::hash_password_blocking;
use crate::response::{created, Envelope};
use crate::state::AppState;

/// POST /v1/sellers
///
/// New accounts start deactivated.
pub async fn register_seller(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterSeller>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let password_hash = hash_password_blocking(input.password).await?;
    let user = NewUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        password_hash,
        activated: false,
    };

    let seller =
        SellerRepo::register(&state.pool, &user, &input.meli_code, &input.meli_cart_url).await?;

    tracing::info!(seller_id = seller.user.id, "Seller registered");

    Ok(created(
        format!("/v1/sellers/{}", seller.user.id),
        Envelope::new("seller", seller),
    ))
}

/// GET /v1/sellers/{id}
pub async fn show_seller(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<SellerProfile>>> {
    let seller = SellerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Seller", id))?;

    Ok(Json(Envelope::new("seller", seller)))
}

/// PATCH /v1/sellers/{id}
///
/// Only supplied fields change. The write is checked against the version
/// read here; a concurrent update in between yields `409 EDIT_CONFLICT`.
pub async fn update_seller(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    AppJson(patch): AppJson<UpdateSeller>,
) -> AppResult<Json<Envelope<SellerProfile>>> {
    let mut seller = SellerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Seller", id))?;

    patch.apply_to(&mut seller);

    let mut v = Validator::new();
    seller.validate(&mut v);
    patch.validate_password(&mut v);
    v.finish()?;

    if let Some(password) = patch.password {
        seller.user.password_hash = hash_password_blocking(password).await?;
    }

    let seller = SellerRepo::update(&state.pool, &seller).await?;

    tracing::info!(seller_id = id, "Seller updated");

    Ok(Json(Envelope::new("seller", seller)))
}
