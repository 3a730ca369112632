//! Country model. Countries are created implicitly by name when shops and
//! products reference them.

use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::Validator;
use serde::Serialize;
use sqlx::FromRow;

use super::check_max_len;

/// A row from the `countries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
}

/// Rules for a single country name.
pub fn validate_country_name(v: &mut Validator, field: &str, name: &str) {
    v.check(!name.is_empty(), field, "must be provided");
    check_max_len(v, field, name, 100);
}
