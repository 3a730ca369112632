//! Repository for the `shops` table and its associations.
//!
//! Creating or updating a shop writes the shop row, resolves its country
//! and category names through get-or-insert, writes the join rows and the
//! image rows, all inside one transaction.

use misarfeh_core::filters::{escape_like, Filters, Metadata};
use misarfeh_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::image::ImageOwner;
use crate::models::shop::{Shop, ShopInput, ShopListFilter, ShopListRow, ShopReplacements};
use crate::repositories::paginate;
use crate::repositories::{
    CategoryRepo, CountryRepo, ImageRepo, ShopCategoryRepo, ShopCountryRepo,
};
use crate::DbError;

/// Column list for `shops` queries, with associated names and image URLs.
const COLUMNS: &str = "\
    shops.id, shops.created_at, shops.title, shops.description, shops.year, \
    shops.follower_count, shops.instagram, shops.telegram, shops.phone, \
    shops.logo_url, shops.verified, shops.rating, shops.rating_count, shops.delivery_time, \
    ARRAY(SELECT countries.name FROM shops_countries \
          JOIN countries ON countries.id = shops_countries.country_id \
          WHERE shops_countries.shop_id = shops.id ORDER BY countries.name) AS countries, \
    ARRAY(SELECT categories.name FROM shops_categories \
          JOIN categories ON categories.id = shops_categories.category_id \
          WHERE shops_categories.shop_id = shops.id ORDER BY categories.name) AS categories, \
    ARRAY(SELECT images.url FROM images \
          WHERE images.shop_id = shops.id ORDER BY images.id) AS img_urls";

/// Sort keys accepted by [`ShopRepo::list`].
pub const SORT_SAFELIST: &[&str] = &[
    "id",
    "title",
    "delivery_time",
    "-id",
    "-title",
    "-delivery_time",
];

/// Provides CRUD operations for shops.
pub struct ShopRepo;

impl ShopRepo {
    /// Insert a shop with its countries, categories, and images.
    pub async fn create(pool: &PgPool, input: &ShopInput) -> Result<Shop, DbError> {
        let mut tx = pool.begin().await?;

        let shop_id: DbId = sqlx::query_scalar(
            "INSERT INTO shops \
                (title, description, year, follower_count, instagram, telegram, \
                 phone, logo_url, delivery_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.year)
        .bind(input.follower_count)
        .bind(&input.instagram)
        .bind(&input.telegram)
        .bind(&input.phone)
        .bind(&input.logo_url)
        .bind(input.delivery_time)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_countries(&mut tx, shop_id, input.countries()).await?;
        Self::link_categories(&mut tx, shop_id, input.categories()).await?;
        ImageRepo::insert_all(&mut tx, ImageOwner::Shop(shop_id), input.img_urls()).await?;

        let shop = Self::fetch(&mut tx, shop_id).await?;
        tx.commit().await?;
        Ok(shop)
    }

    /// Find a shop by ID. Ids below 1 are never looked up.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shop>, DbError> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!("SELECT {COLUMNS} FROM shops WHERE shops.id = $1");
        Ok(sqlx::query_as::<_, Shop>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// List shops matching `filter`, paginated and sorted per `filters`.
    ///
    /// Country and category filters match shops linked to any of the names.
    pub async fn list(
        pool: &PgPool,
        filter: &ShopListFilter,
        filters: &Filters,
    ) -> Result<(Vec<Shop>, Metadata), DbError> {
        let query = format!(
            "SELECT COUNT(*) OVER() AS total_records, {COLUMNS} \
             FROM shops \
             WHERE ($1 = '' OR shops.title ILIKE '%' || $1 || '%') \
               AND ($2 = '' OR shops.instagram ILIKE '%' || $2 || '%') \
               AND (cardinality($3::text[]) = 0 OR EXISTS ( \
                    SELECT 1 FROM shops_countries \
                    JOIN countries ON countries.id = shops_countries.country_id \
                    WHERE shops_countries.shop_id = shops.id AND countries.name = ANY($3))) \
               AND (cardinality($4::text[]) = 0 OR EXISTS ( \
                    SELECT 1 FROM shops_categories \
                    JOIN categories ON categories.id = shops_categories.category_id \
                    WHERE shops_categories.shop_id = shops.id AND categories.name = ANY($4))) \
               AND ($5 = false OR shops.verified) \
             ORDER BY {} \
             LIMIT $6 OFFSET $7",
            filters.order_by("shops")?
        );
        let rows = sqlx::query_as::<_, ShopListRow>(&query)
            .bind(escape_like(&filter.title))
            .bind(escape_like(&filter.instagram))
            .bind(&filter.countries)
            .bind(&filter.categories)
            .bind(filter.verified)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool)
            .await?;
        Ok(paginate(rows, filters, |row| (row.total_records, row.shop)))
    }

    /// Persist the merged state of shop `id`, replacing the associated
    /// collections flagged in `replace`.
    ///
    /// Returns `None` if the shop no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ShopInput,
        replace: ShopReplacements,
    ) -> Result<Option<Shop>, DbError> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE shops SET \
                 title = $2, description = $3, year = $4, follower_count = $5, \
                 instagram = $6, telegram = $7, phone = $8, logo_url = $9, \
                 delivery_time = $10 \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.year)
        .bind(input.follower_count)
        .bind(&input.instagram)
        .bind(&input.telegram)
        .bind(&input.phone)
        .bind(&input.logo_url)
        .bind(input.delivery_time)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if replace.countries {
            ShopCountryRepo::delete_by_shop(&mut tx, id).await?;
            Self::link_countries(&mut tx, id, input.countries()).await?;
        }
        if replace.categories {
            ShopCategoryRepo::delete_by_shop(&mut tx, id).await?;
            Self::link_categories(&mut tx, id, input.categories()).await?;
        }
        if replace.img_urls {
            ImageRepo::replace_all(&mut tx, ImageOwner::Shop(id), input.img_urls()).await?;
        }

        let shop = Self::fetch(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(shop))
    }

    /// Delete a shop by ID; its links, images, and products cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        if id < 1 {
            return Ok(false);
        }
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Transaction building blocks
    // -----------------------------------------------------------------------

    async fn fetch(conn: &mut PgConnection, id: DbId) -> Result<Shop, DbError> {
        let query = format!("SELECT {COLUMNS} FROM shops WHERE shops.id = $1");
        Ok(sqlx::query_as::<_, Shop>(&query)
            .bind(id)
            .fetch_one(conn)
            .await?)
    }

    async fn link_countries(
        conn: &mut PgConnection,
        shop_id: DbId,
        names: &[String],
    ) -> Result<(), DbError> {
        let countries = CountryRepo::get_or_insert(&mut *conn, names).await?;
        for country in &countries {
            ShopCountryRepo::insert(&mut *conn, shop_id, country.id).await?;
        }
        Ok(())
    }

    async fn link_categories(
        conn: &mut PgConnection,
        shop_id: DbId,
        names: &[String],
    ) -> Result<(), DbError> {
        let categories = CategoryRepo::get_or_insert(&mut *conn, names).await?;
        for category in &categories {
            ShopCategoryRepo::insert(&mut *conn, shop_id, category.id).await?;
        }
        Ok(())
    }
}
