//! Image model. An image belongs to a shop or a product, never both.

use misarfeh_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub url: String,
    pub shop_id: Option<DbId>,
    pub product_id: Option<DbId>,
}

/// The single owner of an image row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Shop(DbId),
    Product(DbId),
}

impl ImageOwner {
    /// `(shop_id, product_id)` column values for this owner.
    pub fn columns(self) -> (Option<DbId>, Option<DbId>) {
        match self {
            ImageOwner::Shop(id) => (Some(id), None),
            ImageOwner::Product(id) => (None, Some(id)),
        }
    }

    /// Name of the foreign-key column that identifies this owner.
    pub fn column_name(self) -> &'static str {
        match self {
            ImageOwner::Shop(_) => "shop_id",
            ImageOwner::Product(_) => "product_id",
        }
    }

    pub fn id(self) -> DbId {
        match self {
            ImageOwner::Shop(id) | ImageOwner::Product(id) => id,
        }
    }
}
