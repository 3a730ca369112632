//! Repository for the `shops_categories` join table.

use misarfeh_core::types::DbId;
use sqlx::PgConnection;

use crate::models::shop_association::ShopCategory;
use crate::DbError;

/// Provides shop-to-category association rows.
pub struct ShopCategoryRepo;

impl ShopCategoryRepo {
    /// Link a shop to a category.
    pub async fn insert(
        conn: &mut PgConnection,
        shop_id: DbId,
        category_id: DbId,
    ) -> Result<ShopCategory, DbError> {
        Ok(sqlx::query_as::<_, ShopCategory>(
            "INSERT INTO shops_categories (shop_id, category_id) VALUES ($1, $2) \
             RETURNING shop_id, category_id",
        )
        .bind(shop_id)
        .bind(category_id)
        .fetch_one(conn)
        .await?)
    }

    /// Remove every category link of a shop.
    pub async fn delete_by_shop(conn: &mut PgConnection, shop_id: DbId) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM shops_categories WHERE shop_id = $1")
            .bind(shop_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
