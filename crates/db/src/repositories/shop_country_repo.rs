//! Repository for the `shops_countries` join table.

use misarfeh_core::types::DbId;
use sqlx::PgConnection;

use crate::models::shop_association::ShopCountry;
use crate::DbError;

/// Provides shop-to-country association rows.
pub struct ShopCountryRepo;

impl ShopCountryRepo {
    /// Link a shop to a country.
    pub async fn insert(
        conn: &mut PgConnection,
        shop_id: DbId,
        country_id: DbId,
    ) -> Result<ShopCountry, DbError> {
        Ok(sqlx::query_as::<_, ShopCountry>(
            "INSERT INTO shops_countries (shop_id, country_id) VALUES ($1, $2) \
             RETURNING shop_id, country_id",
        )
        .bind(shop_id)
        .bind(country_id)
        .fetch_one(conn)
        .await?)
    }

    /// Remove every country link of a shop.
    pub async fn delete_by_shop(conn: &mut PgConnection, shop_id: DbId) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM shops_countries WHERE shop_id = $1")
            .bind(shop_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
