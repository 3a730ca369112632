//! Category model and DTOs.

use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::Validator;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_max_len, patch};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `categories` table.
///
/// `img_url` is nullable because categories created implicitly through a
/// shop or product reference carry only a name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub img_url: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
}

/// A category row together with the window count of its list query.
#[derive(Debug, FromRow)]
pub struct CategoryListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub category: Category,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /v1/product/categories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateCategory {
    pub name: String,
    pub img_url: String,
}

impl CreateCategory {
    pub fn validate(&self, v: &mut Validator) {
        validate_category(v, &self.name, &self.img_url);
    }
}

/// Body of `PUT /v1/product/categories/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub img_url: Option<String>,
}

impl UpdateCategory {
    pub fn apply_to(&self, category: &mut Category) {
        patch(&mut category.name, &self.name);
        if let Some(img_url) = &self.img_url {
            category.img_url = Some(img_url.clone());
        }
    }
}

impl Category {
    pub fn validate(&self, v: &mut Validator) {
        validate_category(v, &self.name, self.img_url.as_deref().unwrap_or_default());
    }
}

fn validate_category(v: &mut Validator, name: &str, img_url: &str) {
    v.check(!name.is_empty(), "name", "must be provided");
    check_max_len(v, "name", name, 100);
    v.check(!img_url.is_empty(), "img_url", "must be provided");
}
