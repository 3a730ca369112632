//! Seller model and DTOs. A seller shares its id with a `users` row.

use misarfeh_core::types::DbId;
use misarfeh_core::validator::{matches, Validator, MELI_CODE_RX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::{validate_password_plaintext, validate_user_fields, User};
use super::{check_max_len, patch};

/// A row from the `sellers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Seller {
    pub id: DbId,
    pub meli_code: String,
    pub meli_cart_url: String,
}

/// A seller's user account with its seller details, as returned by the API.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerProfile {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub meli_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub meli_cart_url: String,
}

/// Rules for the seller-specific fields.
pub fn validate_seller_fields(v: &mut Validator, meli_code: &str) {
    check_max_len(v, "meli_code", meli_code, 20);
    v.check(
        meli_code.is_empty() || matches(meli_code, &MELI_CODE_RX),
        "meli_code",
        "must be a valid meli code",
    );
}

impl SellerProfile {
    pub fn validate(&self, v: &mut Validator) {
        self.user.validate(v);
        validate_seller_fields(v, &self.meli_code);
    }
}

/// Body of `POST /v1/sellers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterSeller {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub meli_code: String,
    pub meli_cart_url: String,
}

impl RegisterSeller {
    pub fn validate(&self, v: &mut Validator) {
        validate_user_fields(
            v,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
        );
        validate_password_plaintext(v, &self.password);
        validate_seller_fields(v, &self.meli_code);
    }
}

/// Body of `PATCH /v1/sellers/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateSeller {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub meli_code: Option<String>,
    pub meli_cart_url: Option<String>,
}

impl UpdateSeller {
    /// Merge supplied profile fields. The password is handled separately
    /// because it must be validated and hashed before it is stored.
    pub fn apply_to(&self, profile: &mut SellerProfile) {
        patch(&mut profile.user.first_name, &self.first_name);
        patch(&mut profile.user.last_name, &self.last_name);
        patch(&mut profile.user.phone, &self.phone);
        patch(&mut profile.user.email, &self.email);
        patch(&mut profile.meli_code, &self.meli_code);
        patch(&mut profile.meli_cart_url, &self.meli_cart_url);
    }

    pub fn validate_password(&self, v: &mut Validator) {
        if let Some(password) = &self.password {
            validate_password_plaintext(v, password);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterSeller {
        RegisterSeller {
            first_name: "Sara".into(),
            last_name: "Ahmadi".into(),
            phone: "09123456789".into(),
            email: "sara@example.com".into(),
            password: "correct horse".into(),
            meli_code: "0012345678".into(),
            meli_cart_url: String::new(),
        }
    }

    fn profile() -> SellerProfile {
        SellerProfile {
            user: User {
                id: 3,
                created_at: chrono::Utc::now(),
                first_name: "Sara".into(),
                last_name: "Ahmadi".into(),
                email: String::new(),
                phone: "09123456789".into(),
                password_hash: "hash".into(),
                activated: false,
                version: 1,
            },
            meli_code: String::new(),
            meli_cart_url: String::new(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        let mut v = Validator::new();
        registration().validate(&mut v);
        assert!(v.valid(), "{}", v.errors());
    }

    #[test]
    fn meli_code_must_be_ten_digits() {
        let mut v = Validator::new();
        RegisterSeller {
            meli_code: "12345".into(),
            ..registration()
        }
        .validate(&mut v);
        assert_eq!(
            v.errors().get("meli_code"),
            Some("must be a valid meli code")
        );
    }

    #[test]
    fn empty_meli_code_allowed() {
        let mut v = Validator::new();
        RegisterSeller {
            meli_code: String::new(),
            ..registration()
        }
        .validate(&mut v);
        assert!(v.valid());
    }

    #[test]
    fn registration_requires_password() {
        let mut v = Validator::new();
        RegisterSeller {
            password: String::new(),
            ..registration()
        }
        .validate(&mut v);
        assert_eq!(v.errors().get("password"), Some("must be provided"));
    }

    #[test]
    fn profile_flattens_user() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["first_name"], "Sara");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("meli_code").is_none());
    }

    #[test]
    fn patch_without_password_skips_password_rules() {
        let patch = UpdateSeller {
            meli_code: Some("0012345678".into()),
            ..Default::default()
        };
        let mut p = profile();
        patch.apply_to(&mut p);

        let mut v = Validator::new();
        p.validate(&mut v);
        patch.validate_password(&mut v);
        assert!(v.valid());
        assert_eq!(p.meli_code, "0012345678");
    }
}
