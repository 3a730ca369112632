//! Repository for the `sellers` table.
//!
//! A seller is written together with its `users` row; registration and
//! profile updates each run in one transaction.

use misarfeh_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::seller::{Seller, SellerProfile};
use crate::models::user::NewUser;
use crate::repositories::user_repo::{self, UserRepo};
use crate::DbError;

/// Provides seller registration and profile storage.
pub struct SellerRepo;

impl SellerRepo {
    /// Create a user and its seller row.
    pub async fn register(
        pool: &PgPool,
        user: &NewUser,
        meli_code: &str,
        meli_cart_url: &str,
    ) -> Result<SellerProfile, DbError> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::create(&mut tx, user).await?;
        let seller = Self::insert(&mut tx, user.id, meli_code, meli_cart_url).await?;

        tx.commit().await?;
        Ok(SellerProfile {
            user,
            meli_code: seller.meli_code,
            meli_cart_url: seller.meli_cart_url,
        })
    }

    /// Insert the seller row for an existing user.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: DbId,
        meli_code: &str,
        meli_cart_url: &str,
    ) -> Result<Seller, DbError> {
        Ok(sqlx::query_as::<_, Seller>(
            "INSERT INTO sellers (id, meli_code, meli_cart_url) VALUES ($1, $2, $3) \
             RETURNING id, meli_code, meli_cart_url",
        )
        .bind(user_id)
        .bind(meli_code)
        .bind(meli_cart_url)
        .fetch_one(conn)
        .await?)
    }

    /// Find a seller with its user account. Ids below 1 are never looked up.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SellerProfile>, DbError> {
        if id < 1 {
            return Ok(None);
        }
        let query = format!(
            "SELECT {}, sellers.meli_code, sellers.meli_cart_url \
             FROM users JOIN sellers ON sellers.id = users.id \
             WHERE users.id = $1",
            user_repo::COLUMNS
        );
        Ok(sqlx::query_as::<_, SellerProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Write back a merged profile. The user row is version checked; a
    /// concurrent change yields [`DbError::EditConflict`] and nothing is
    /// written.
    pub async fn update(pool: &PgPool, profile: &SellerProfile) -> Result<SellerProfile, DbError> {
        let mut tx = pool.begin().await?;

        let user = UserRepo::update(&mut tx, &profile.user).await?;
        let seller = sqlx::query_as::<_, Seller>(
            "UPDATE sellers SET meli_code = $2, meli_cart_url = $3 \
             WHERE id = $1 \
             RETURNING id, meli_code, meli_cart_url",
        )
        .bind(user.id)
        .bind(&profile.meli_code)
        .bind(&profile.meli_cart_url)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::EditConflict)?;

        tx.commit().await?;
        Ok(SellerProfile {
            user,
            meli_code: seller.meli_code,
            meli_cart_url: seller.meli_cart_url,
        })
    }
}
