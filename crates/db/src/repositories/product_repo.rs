//! Repository for the `products` table.
//!
//! Category and country names are resolved through get-or-insert and the
//! product row and its images are written in the same transaction.

use misarfeh_core::filters::{escape_like, Filters, Metadata};
use misarfeh_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::image::ImageOwner;
use crate::models::product::{Product, ProductInput, ProductListFilter, ProductListRow};
use crate::repositories::paginate;
use crate::repositories::{CategoryRepo, CountryRepo, ImageRepo};
use crate::DbError;

/// Column list for `products` queries joined through [`FROM`].
const COLUMNS: &str = "\
    products.id, products.created_at, products.shop_id, \
    products.category_id, categories.name AS category, \
    products.country_id, countries.name AS country, \
    products.name, products.description, products.price, products.sale_price, \
    products.off, products.brand, \
    ARRAY(SELECT images.url FROM images \
          WHERE images.product_id = products.id ORDER BY images.id) AS img_urls";

/// `FROM` clause resolving category and country names.
const FROM: &str = "\
    products \
    JOIN categories ON categories.id = products.category_id \
    JOIN countries ON countries.id = products.country_id";

/// Sort keys accepted by [`ProductRepo::list`].
pub const SORT_SAFELIST: &[&str] = &[
    "id",
    "name",
    "price",
    "sale_price",
    "-id",
    "-name",
    "-price",
    "-sale_price",
];

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product with its images.
    pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<Product, DbError> {
        let mut tx = pool.begin().await?;

        let (category_id, country_id) = Self::resolve_references(&mut tx, input).await?;
        let product_id: DbId = sqlx::query_scalar(
            "INSERT INTO products \
                (shop_id, category_id, country_id, name, description, \
                 price, sale_price, off, brand) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(input.shop_id)
        .bind(category_id)
        .bind(country_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_price)
        .bind(input.off)
        .bind(&input.brand)
        .fetch_one(&mut *tx)
        .await?;

        ImageRepo::insert_all(&mut tx, ImageOwner::Product(product_id), input.img_urls()).await?;

        let product = Self::fetch(&mut tx, product_id).await?;
        tx.commit().await?;
        Ok(product)
    }

    /// Find a product by ID. Ids below 1 are never looked up.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, DbError> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE products.id = $1");
        Ok(sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// List products matching `filter`, paginated and sorted per `filters`.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductListFilter,
        filters: &Filters,
    ) -> Result<(Vec<Product>, Metadata), DbError> {
        let query = format!(
            "SELECT COUNT(*) OVER() AS total_records, {COLUMNS} \
             FROM {FROM} \
             WHERE ($1 = '' OR products.name ILIKE '%' || $1 || '%') \
               AND ($2 = '' OR products.brand ILIKE '%' || $2 || '%') \
               AND ($3 = '' OR categories.name = $3) \
               AND ($4 = '' OR countries.name = $4) \
               AND ($5::bigint IS NULL OR products.shop_id = $5) \
             ORDER BY {} \
             LIMIT $6 OFFSET $7",
            filters.order_by("products")?
        );
        let rows = sqlx::query_as::<_, ProductListRow>(&query)
            .bind(escape_like(&filter.name))
            .bind(escape_like(&filter.brand))
            .bind(&filter.category)
            .bind(&filter.country)
            .bind(filter.shop_id)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool)
            .await?;
        Ok(paginate(rows, filters, |row| (row.total_records, row.product)))
    }

    /// Persist the merged state of product `id`. Images are replaced only
    /// when `replace_images` is set.
    ///
    /// Returns `None` if the product no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProductInput,
        replace_images: bool,
    ) -> Result<Option<Product>, DbError> {
        let mut tx = pool.begin().await?;

        let (category_id, country_id) = Self::resolve_references(&mut tx, input).await?;
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE products SET \
                 category_id = $2, country_id = $3, name = $4, description = $5, \
                 price = $6, sale_price = $7, off = $8, brand = $9 \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(category_id)
        .bind(country_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_price)
        .bind(input.off)
        .bind(&input.brand)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if replace_images {
            ImageRepo::replace_all(&mut tx, ImageOwner::Product(id), input.img_urls()).await?;
        }

        let product = Self::fetch(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(product))
    }

    /// Delete a product by ID; its images and comments cascade.
    ///
    /// Returns `false` without querying for ids below 1.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        if id < 1 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch(conn: &mut PgConnection, id: DbId) -> Result<Product, DbError> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE products.id = $1");
        Ok(sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_one(conn)
            .await?)
    }

    /// Resolve the product's category and country names to ids.
    async fn resolve_references(
        conn: &mut PgConnection,
        input: &ProductInput,
    ) -> Result<(DbId, DbId), DbError> {
        let categories =
            CategoryRepo::get_or_insert(&mut *conn, std::slice::from_ref(&input.category)).await?;
        let countries =
            CountryRepo::get_or_insert(&mut *conn, std::slice::from_ref(&input.country)).await?;
        match (categories.first(), countries.first()) {
            (Some(category), Some(country)) => Ok((category.id, country.id)),
            _ => Err(DbError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }
}
