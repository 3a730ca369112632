//! Repository for the `comments` table.

use misarfeh_core::filters::{Filters, Metadata};
use misarfeh_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentInput, CommentListRow};
use crate::repositories::paginate;
use crate::DbError;

/// Column list for `comments` queries.
const COLUMNS: &str = "id, created_at, product_id, text, phone, username, rate";

/// Sort keys accepted by [`CommentRepo::list`].
pub const SORT_SAFELIST: &[&str] = &["id", "rate", "created_at", "-id", "-rate", "-created_at"];

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CommentInput) -> Result<Comment, DbError> {
        let query = format!(
            "INSERT INTO comments (product_id, text, phone, username, rate) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Comment>(&query)
            .bind(input.product_id)
            .bind(&input.text)
            .bind(&input.phone)
            .bind(&input.username)
            .bind(input.rate)
            .fetch_one(pool)
            .await?)
    }

    /// Find a comment by ID. Ids below 1 are never looked up.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, DbError> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        Ok(sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// List comments, optionally for a single product.
    pub async fn list(
        pool: &PgPool,
        product_id: Option<DbId>,
        filters: &Filters,
    ) -> Result<(Vec<Comment>, Metadata), DbError> {
        let query = format!(
            "SELECT COUNT(*) OVER() AS total_records, {COLUMNS} \
             FROM comments \
             WHERE ($1::bigint IS NULL OR product_id = $1) \
             ORDER BY {} \
             LIMIT $2 OFFSET $3",
            filters.order_by("comments")?
        );
        let rows = sqlx::query_as::<_, CommentListRow>(&query)
            .bind(product_id)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool)
            .await?;
        Ok(paginate(rows, filters, |row| (row.total_records, row.comment)))
    }

    /// Persist the merged state of comment `id`.
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CommentInput,
    ) -> Result<Option<Comment>, DbError> {
        let query = format!(
            "UPDATE comments SET text = $2, phone = $3, username = $4, rate = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(&input.phone)
            .bind(&input.username)
            .bind(input.rate)
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a comment by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        if id < 1 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
