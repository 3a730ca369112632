//! Shop model and DTOs.
//!
//! A shop's countries, categories, and image URLs live in join and image
//! tables; the entity struct carries them as name lists assembled by the
//! repository's select.

use chrono::Datelike;
use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::{check_contact_phone, Validator};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use super::{check_max_len, check_name_list, patch};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `shops` table plus its associated names and image URLs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shop {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instagram: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub telegram: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub rating_count: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub img_urls: Vec<String>,
    /// Weeks; rendered as `"<n> هفته"` and omitted when zero.
    #[serde(serialize_with = "render_weeks", skip_serializing_if = "is_zero_i16")]
    pub delivery_time: i16,
}

/// A shop row together with the window count of its list query.
#[derive(Debug, FromRow)]
pub struct ShopListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub shop: Shop,
}

/// Query-string filters for `GET /v1/shops`. Empty values do not filter.
#[derive(Debug, Clone, Default)]
pub struct ShopListFilter {
    /// Case-insensitive substring of the title.
    pub title: String,
    /// Case-insensitive substring of the instagram handle.
    pub instagram: String,
    /// Shops serving any of these countries.
    pub countries: Vec<String>,
    /// Shops in any of these categories.
    pub categories: Vec<String>,
    /// `true` restricts the list to verified shops.
    pub verified: bool,
}

fn render_weeks<S: Serializer>(weeks: &i16, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{weeks} هفته"))
}

fn is_zero_i16(value: &i16) -> bool {
    *value == 0
}

fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Writable shop fields: the body of `POST /v1/shops`, and the merged state
/// of an existing shop after a patch.
///
/// List fields are `Option` so an absent list ("must be provided") can be
/// told apart from an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopInput {
    pub title: String,
    pub description: String,
    pub year: i32,
    pub follower_count: Option<i32>,
    pub instagram: String,
    pub telegram: String,
    pub phone: String,
    pub logo_url: String,
    pub countries: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub img_urls: Option<Vec<String>>,
    pub delivery_time: i16,
}

impl ShopInput {
    pub fn validate(&self, v: &mut Validator) {
        v.check(!self.title.is_empty(), "title", "must be provided");
        check_max_len(v, "title", &self.title, 100);

        v.check(self.year != 0, "year", "must be provided");
        v.check(self.year >= 1900, "year", "must not be earlier than 1900");
        v.check(
            self.year <= chrono::Utc::now().year(),
            "year",
            "must not be in the future",
        );

        check_max_len(v, "description", &self.description, 1000);
        check_max_len(v, "instagram", &self.instagram, 100);
        check_max_len(v, "telegram", &self.telegram, 100);

        check_contact_phone(v, "phone", &self.phone);

        check_name_list(v, "countries", self.countries.as_deref(), "country");
        check_name_list(v, "categories", self.categories.as_deref(), "category");
        if let Some(img_urls) = &self.img_urls {
            v.check(
                img_urls.len() <= 5,
                "img_urls",
                "must not contain more than 5 entries",
            );
            v.check(
                misarfeh_core::validator::unique(img_urls),
                "img_urls",
                "must not contain duplicate values",
            );
        }

        v.check(self.delivery_time != 0, "delivery_time", "must be provided");
        v.check(
            self.delivery_time >= 1,
            "delivery_time",
            "must be at least 1 week",
        );
        v.check(
            self.delivery_time <= 100,
            "delivery_time",
            "must not be more than 100 weeks",
        );
    }

    pub fn countries(&self) -> &[String] {
        self.countries.as_deref().unwrap_or_default()
    }

    pub fn categories(&self) -> &[String] {
        self.categories.as_deref().unwrap_or_default()
    }

    pub fn img_urls(&self) -> &[String] {
        self.img_urls.as_deref().unwrap_or_default()
    }
}

impl From<&Shop> for ShopInput {
    fn from(shop: &Shop) -> Self {
        Self {
            title: shop.title.clone(),
            description: shop.description.clone(),
            year: shop.year,
            follower_count: shop.follower_count,
            instagram: shop.instagram.clone(),
            telegram: shop.telegram.clone(),
            phone: shop.phone.clone(),
            logo_url: shop.logo_url.clone(),
            countries: Some(shop.countries.clone()),
            categories: Some(shop.categories.clone()),
            img_urls: Some(shop.img_urls.clone()),
            delivery_time: shop.delivery_time,
        }
    }
}

/// Body of `PATCH /v1/shops/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateShop {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub follower_count: Option<i32>,
    pub instagram: Option<String>,
    pub telegram: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub countries: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub img_urls: Option<Vec<String>>,
    pub delivery_time: Option<i16>,
}

/// Which associated collections a patch replaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShopReplacements {
    pub countries: bool,
    pub categories: bool,
    pub img_urls: bool,
}

impl UpdateShop {
    pub fn apply_to(&self, input: &mut ShopInput) {
        patch(&mut input.title, &self.title);
        patch(&mut input.description, &self.description);
        patch(&mut input.year, &self.year);
        if self.follower_count.is_some() {
            input.follower_count = self.follower_count;
        }
        patch(&mut input.instagram, &self.instagram);
        patch(&mut input.telegram, &self.telegram);
        patch(&mut input.phone, &self.phone);
        patch(&mut input.logo_url, &self.logo_url);
        if self.countries.is_some() {
            input.countries = self.countries.clone();
        }
        if self.categories.is_some() {
            input.categories = self.categories.clone();
        }
        if self.img_urls.is_some() {
            input.img_urls = self.img_urls.clone();
        }
        patch(&mut input.delivery_time, &self.delivery_time);
    }

    pub fn replacements(&self) -> ShopReplacements {
        ShopReplacements {
            countries: self.countries.is_some(),
            categories: self.categories.is_some(),
            img_urls: self.img_urls.is_some(),
        }
    }
}
