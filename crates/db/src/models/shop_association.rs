//! Rows of the `shops_countries` and `shops_categories` join tables.

use misarfeh_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `shops_countries` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct ShopCountry {
    pub shop_id: DbId,
    pub country_id: DbId,
}

/// A row from the `shops_categories` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct ShopCategory {
    pub shop_id: DbId,
    pub category_id: DbId,
}
