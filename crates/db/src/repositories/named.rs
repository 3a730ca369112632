//! Get-or-insert for rows keyed by a unique name.
//!
//! Shops and products refer to countries and categories by free-text name.
//! Each name is resolved to a row, inserting it on a miss, on the caller's
//! connection so the whole write shares one transaction.

use misarfeh_core::dedup::resolve_unique;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

use crate::DbError;

/// A table whose rows are identified by a unique `name` column.
pub trait NamedRow: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Table name.
    const TABLE: &'static str;
    /// Singular entity name used in error messages.
    const ENTITY: &'static str;
    /// Column list selected and returned for a row.
    const COLUMNS: &'static str;
}

/// Resolve `names` to rows in input order, inserting rows that do not exist.
///
/// Calling this twice with the same names inserts nothing the second time
/// and returns the same rows. More than one row for a name is reported as
/// [`DbError::Inconsistent`].
pub async fn get_or_insert<T: NamedRow>(
    conn: &mut PgConnection,
    names: &[String],
) -> Result<Vec<T>, DbError> {
    let select = format!("SELECT {} FROM {} WHERE name = $1", T::COLUMNS, T::TABLE);
    let insert = format!(
        "INSERT INTO {} (name) VALUES ($1) RETURNING {}",
        T::TABLE,
        T::COLUMNS
    );

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let rows = sqlx::query_as::<_, T>(&select)
            .bind(name)
            .fetch_all(&mut *conn)
            .await?;

        let row = match resolve_unique(T::ENTITY, name, rows)? {
            Some(row) => row,
            None => {
                tracing::debug!(entity = T::ENTITY, name = %name, "Inserting named row");
                sqlx::query_as::<_, T>(&insert)
                    .bind(name)
                    .fetch_one(&mut *conn)
                    .await?
            }
        };
        resolved.push(row);
    }
    Ok(resolved)
}
