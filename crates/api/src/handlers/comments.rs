//! Handlers for the `/v1/product/comments` resource.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use misarfeh_core::validator::Validator;
use misarfeh_db::models::comment::{Comment, CommentInput, UpdateComment};
use misarfeh_db::repositories::comment_repo::SORT_SAFELIST;
use misarfeh_db::repositories::CommentRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, ResourceId};
use crate::handlers::not_found;
use crate::query::QueryParams;
use crate::response::{created, deleted, Envelope, ListEnvelope};
use crate::state::AppState;

/// POST /v1/product/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AppJson(input): AppJson<CommentInput>,
) -> AppResult<Response> {
    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let comment = CommentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        comment_id = comment.id,
        product_id = ?comment.product_id,
        "Comment created"
    );

    Ok(created(
        format!("/v1/product/comments/{}", comment.id),
        Envelope::new("comment", comment),
    ))
}

/// GET /v1/product/comments/{id}
pub async fn show_comment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<Comment>>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    Ok(Json(Envelope::new("comment", comment)))
}

/// GET /v1/product/comments
///
/// Query parameters: `product_id`, `page`, `page_size`, `sort`.
pub async fn list_comments(
    State(state): State<AppState>,
    params: QueryParams,
) -> AppResult<Json<ListEnvelope<Comment>>> {
    let mut v = Validator::new();
    let product_id = params.optional_int("product_id", &mut v);
    let filters = params.filters(SORT_SAFELIST, &mut v);
    filters.validate(&mut v);
    v.finish()?;

    let page = CommentRepo::list(&state.pool, product_id, &filters).await?;

    Ok(Json(ListEnvelope::new("comments", page)))
}

/// PUT /v1/product/comments/{id}
///
/// Partial update: only supplied fields change.
pub async fn update_comment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    AppJson(patch): AppJson<UpdateComment>,
) -> AppResult<Json<Envelope<Comment>>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    let mut input = CommentInput::from(&comment);
    patch.apply_to(&mut input);

    let mut v = Validator::new();
    input.validate(&mut v);
    v.finish()?;

    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Comment", id))?;

    tracing::info!(comment_id = id, "Comment updated");

    Ok(Json(Envelope::new("comment", comment)))
}

/// DELETE /v1/product/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Envelope<String>>> {
    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(not_found("Comment", id));
    }

    tracing::info!(comment_id = id, "Comment deleted");

    Ok(deleted("comment"))
}
