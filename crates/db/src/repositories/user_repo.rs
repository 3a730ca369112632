//! Repository for the `users` table.

use sqlx::PgConnection;

use crate::models::user::{NewUser, User};
use crate::DbError;

/// Column list for `users` queries.
pub(crate) const COLUMNS: &str = "\
    users.id, users.created_at, users.first_name, users.last_name, users.email, \
    users.phone, users.password_hash, users.activated, users.version";

/// Provides account storage with optimistic version checks.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user.
    ///
    /// A duplicate phone surfaces as a `users_phone_key` unique violation.
    pub async fn create(conn: &mut PgConnection, input: &NewUser) -> Result<User, DbError> {
        let query = format!(
            "INSERT INTO users \
                (first_name, last_name, email, phone, password_hash, activated) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(input.activated)
            .fetch_one(conn)
            .await?)
    }

    /// Write `user` back if its `version` still matches the stored row,
    /// bumping the version.
    ///
    /// Returns [`DbError::EditConflict`] when the row changed (or vanished)
    /// since it was read.
    pub async fn update(conn: &mut PgConnection, user: &User) -> Result<User, DbError> {
        let query = format!(
            "UPDATE users SET \
                 first_name = $1, last_name = $2, email = $3, phone = $4, \
                 password_hash = $5, activated = $6, version = version + 1 \
             WHERE id = $7 AND version = $8 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.activated)
            .bind(user.id)
            .bind(user.version)
            .fetch_optional(conn)
            .await?
            .ok_or(DbError::EditConflict)
    }
}
