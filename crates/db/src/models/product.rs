//! Product model and DTOs.
//!
//! Products reference one category and one country by id; clients send and
//! receive them by name, resolved through get-or-insert on write.

use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::Validator;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use super::country::validate_country_name;
use super::{check_max_len, check_name_list, patch};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `products` table joined with its category and country
/// names and its image URLs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub shop_id: Option<DbId>,
    #[serde(skip_serializing)]
    pub category_id: DbId,
    pub category: String,
    #[serde(skip_serializing)]
    pub country_id: DbId,
    pub country: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub sale_price: i64,
    /// Discount percentage; rendered as `"<n>%"` and omitted when zero.
    #[serde(serialize_with = "render_percent", skip_serializing_if = "is_zero")]
    pub off: i32,
    pub brand: String,
    pub img_urls: Vec<String>,
}

/// A product row together with the window count of its list query.
#[derive(Debug, FromRow)]
pub struct ProductListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub product: Product,
}

/// Query-string filters for `GET /v1/products`. Empty values do not filter.
#[derive(Debug, Clone, Default)]
pub struct ProductListFilter {
    /// Case-insensitive substring of the product name.
    pub name: String,
    /// Case-insensitive substring of the brand.
    pub brand: String,
    /// Exact category name.
    pub category: String,
    /// Exact country name.
    pub country: String,
    pub shop_id: Option<DbId>,
}

fn render_percent<S: Serializer>(off: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{off}%"))
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Writable product fields: the body of `POST /v1/products`, and the merged
/// state of an existing product after a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductInput {
    pub shop_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub sale_price: i64,
    pub off: i32,
    pub brand: String,
    pub category: String,
    pub country: String,
    pub img_urls: Option<Vec<String>>,
}

impl ProductInput {
    pub fn validate(&self, v: &mut Validator) {
        v.check(!self.name.is_empty(), "name", "must be provided");
        check_max_len(v, "name", &self.name, 100);

        v.check(self.price >= 0.0, "price", "must not be negative");
        v.check(self.sale_price != 0, "sale_price", "must be provided");

        v.check(self.off < 100, "off", "must be less than 100");
        v.check(self.off >= 0, "off", "must not be negative");

        check_max_len(v, "description", &self.description, 1000);

        v.check(!self.brand.is_empty(), "brand", "must be provided");
        check_max_len(v, "brand", &self.brand, 100);

        v.check(!self.category.is_empty(), "category", "must be provided");
        check_max_len(v, "category", &self.category, 100);

        validate_country_name(v, "country", &self.country);

        if let Some(shop_id) = self.shop_id {
            v.check(shop_id > 0, "shop_id", "must be a positive integer");
        }

        check_name_list(v, "img_urls", self.img_urls.as_deref(), "image");
    }

    pub fn img_urls(&self) -> &[String] {
        self.img_urls.as_deref().unwrap_or_default()
    }
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            shop_id: product.shop_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            sale_price: product.sale_price,
            off: product.off,
            brand: product.brand.clone(),
            category: product.category.clone(),
            country: product.country.clone(),
            img_urls: Some(product.img_urls.clone()),
        }
    }
}

/// Body of `PATCH /v1/products/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub sale_price: Option<i64>,
    pub off: Option<i32>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub img_urls: Option<Vec<String>>,
}

impl UpdateProduct {
    pub fn apply_to(&self, input: &mut ProductInput) {
        patch(&mut input.name, &self.name);
        patch(&mut input.description, &self.description);
        patch(&mut input.price, &self.price);
        patch(&mut input.sale_price, &self.sale_price);
        patch(&mut input.off, &self.off);
        patch(&mut input.brand, &self.brand);
        patch(&mut input.category, &self.category);
        patch(&mut input.country, &self.country);
        if self.img_urls.is_some() {
            input.img_urls = self.img_urls.clone();
        }
    }

    /// Whether the patch replaces the product's image set.
    pub fn replaces_images(&self) -> bool {
        self.img_urls.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProductInput {
        ProductInput {
            name: "Runner".into(),
            price: 120.5,
            sale_price: 99,
            brand: "Acme".into(),
            category: "Shoes".into(),
            country: "Iran".into(),
            img_urls: Some(vec!["http://localhost:4000/v1/images/1.png".into()]),
            ..Default::default()
        }
    }

    fn errors(input: &ProductInput) -> Validator {
        let mut v = Validator::new();
        input.validate(&mut v);
        v
    }

    fn product() -> Product {
        Product {
            id: 4,
            created_at: chrono::Utc::now(),
            shop_id: Some(2),
            category_id: 1,
            category: "Shoes".into(),
            country_id: 1,
            country: "Iran".into(),
            name: "Runner".into(),
            description: String::new(),
            price: 120.5,
            sale_price: 99,
            off: 15,
            brand: "Acme".into(),
            img_urls: vec!["a.png".into()],
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(errors(&valid_input()).valid());
    }

    #[test]
    fn off_bounds() {
        let v = errors(&ProductInput {
            off: 100,
            ..valid_input()
        });
        assert_eq!(v.errors().get("off"), Some("must be less than 100"));
        let v = errors(&ProductInput {
            off: -1,
            ..valid_input()
        });
        assert_eq!(v.errors().get("off"), Some("must not be negative"));
    }

    #[test]
    fn images_required_and_unique() {
        let v = errors(&ProductInput {
            img_urls: None,
            ..valid_input()
        });
        assert_eq!(v.errors().get("img_urls"), Some("must be provided"));
        let v = errors(&ProductInput {
            img_urls: Some(vec!["a.png".into(), "a.png".into()]),
            ..valid_input()
        });
        assert_eq!(
            v.errors().get("img_urls"),
            Some("must not contain duplicate values")
        );
    }

    #[test]
    fn sale_price_and_references_required() {
        let v = errors(&ProductInput {
            sale_price: 0,
            category: String::new(),
            country: String::new(),
            ..valid_input()
        });
        assert_eq!(v.errors().get("sale_price"), Some("must be provided"));
        assert_eq!(v.errors().get("category"), Some("must be provided"));
        assert_eq!(v.errors().get("country"), Some("must be provided"));
    }

    #[test]
    fn off_rendered_as_percent() {
        let json = serde_json::to_value(product()).unwrap();
        assert_eq!(json["off"], "15%");
        assert!(json.get("shop_id").is_none());
        assert!(json.get("category_id").is_none());
        assert_eq!(json["category"], "Shoes");
    }

    #[test]
    fn zero_off_omitted() {
        let json = serde_json::to_value(Product {
            off: 0,
            ..product()
        })
        .unwrap();
        assert!(json.get("off").is_none());
    }

    #[test]
    fn patch_keeps_unsupplied_fields() {
        let mut input = ProductInput::from(&product());
        let patch = UpdateProduct {
            price: Some(80.0),
            ..Default::default()
        };
        patch.apply_to(&mut input);
        assert_eq!(input.price, 80.0);
        assert_eq!(input.brand, "Acme");
        assert_eq!(input.shop_id, Some(2));
        assert!(!patch.replaces_images());
    }
}
