//! Repository for the `categories` table.

use misarfeh_core::filters::{Filters, Metadata};
use misarfeh_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::category::{Category, CategoryListRow, CreateCategory};
use crate::repositories::named::{self, NamedRow};
use crate::repositories::paginate;
use crate::DbError;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, img_url, created_at";

/// Sort keys accepted by [`CategoryRepo::list`].
pub const SORT_SAFELIST: &[&str] = &["id", "name", "-id", "-name"];

impl NamedRow for Category {
    const TABLE: &'static str = "categories";
    const ENTITY: &'static str = "category";
    const COLUMNS: &'static str = COLUMNS;
}

/// Provides CRUD operations and get-or-insert for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category.
    ///
    /// A duplicate name surfaces as a `categories_name_key` unique violation.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, DbError> {
        let query = format!(
            "INSERT INTO categories (name, img_url) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.img_url)
            .fetch_one(pool)
            .await?)
    }

    /// Resolve category names to rows, inserting missing ones.
    pub async fn get_or_insert(
        conn: &mut PgConnection,
        names: &[String],
    ) -> Result<Vec<Category>, DbError> {
        named::get_or_insert(conn, names).await
    }

    /// Find a category by ID. Ids below 1 are never looked up.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, DbError> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// List categories, optionally narrowed to an exact name.
    pub async fn list(
        pool: &PgPool,
        name: &str,
        filters: &Filters,
    ) -> Result<(Vec<Category>, Metadata), DbError> {
        let query = format!(
            "SELECT COUNT(*) OVER() AS total_records, {COLUMNS} \
             FROM categories \
             WHERE ($1 = '' OR name = $1) \
             ORDER BY {} \
             LIMIT $2 OFFSET $3",
            filters.order_by("categories")?
        );
        let rows = sqlx::query_as::<_, CategoryListRow>(&query)
            .bind(name)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool)
            .await?;
        Ok(paginate(rows, filters, |row| (row.total_records, row.category)))
    }

    /// Persist the full state of an already merged category.
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn update(pool: &PgPool, category: &Category) -> Result<Option<Category>, DbError> {
        let query = format!(
            "UPDATE categories SET name = $2, img_url = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.img_url)
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a category by ID. Returns `true` if a row was deleted.
    ///
    /// A category still referenced by a shop or product surfaces as a
    /// foreign key violation.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        if id < 1 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
