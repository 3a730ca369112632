//! Repository for the `images` table.

use sqlx::PgConnection;

use crate::models::image::{Image, ImageOwner};
use crate::DbError;

/// Column list for `images` queries.
const COLUMNS: &str = "id, url, shop_id, product_id";

/// Provides image rows for shops and products.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert one image row for `owner`.
    pub async fn insert(
        conn: &mut PgConnection,
        owner: ImageOwner,
        url: &str,
    ) -> Result<Image, DbError> {
        let (shop_id, product_id) = owner.columns();
        let query = format!(
            "INSERT INTO images (url, shop_id, product_id) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Image>(&query)
            .bind(url)
            .bind(shop_id)
            .bind(product_id)
            .fetch_one(conn)
            .await?)
    }

    /// Insert one row per URL, in order.
    pub async fn insert_all(
        conn: &mut PgConnection,
        owner: ImageOwner,
        urls: &[String],
    ) -> Result<Vec<Image>, DbError> {
        let mut images = Vec::with_capacity(urls.len());
        for url in urls {
            images.push(Self::insert(&mut *conn, owner, url).await?);
        }
        Ok(images)
    }

    /// Delete every image of `owner`. Returns the number of rows removed.
    pub async fn delete_by_owner(
        conn: &mut PgConnection,
        owner: ImageOwner,
    ) -> Result<u64, DbError> {
        let query = format!("DELETE FROM images WHERE {} = $1", owner.column_name());
        let result = sqlx::query(&query).bind(owner.id()).execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Replace the image set of `owner` with `urls`.
    pub async fn replace_all(
        conn: &mut PgConnection,
        owner: ImageOwner,
        urls: &[String],
    ) -> Result<Vec<Image>, DbError> {
        Self::delete_by_owner(&mut *conn, owner).await?;
        Self::insert_all(conn, owner, urls).await
    }
}
