//! Repository for the `countries` table.

use sqlx::PgConnection;

use crate::models::country::Country;
use crate::repositories::named::{self, NamedRow};
use crate::DbError;

/// Column list for `countries` queries.
const COLUMNS: &str = "id, name, created_at";

impl NamedRow for Country {
    const TABLE: &'static str = "countries";
    const ENTITY: &'static str = "country";
    const COLUMNS: &'static str = COLUMNS;
}

/// Provides lookups and get-or-insert for countries.
pub struct CountryRepo;

impl CountryRepo {
    /// Resolve country names to rows, inserting missing ones.
    pub async fn get_or_insert(
        conn: &mut PgConnection,
        names: &[String],
    ) -> Result<Vec<Country>, DbError> {
        named::get_or_insert(conn, names).await
    }

}
