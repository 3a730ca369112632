//! User account model and validation rules.

use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::{matches, valid_email, Validator, PHONE_RX};
use serde::Serialize;
use sqlx::FromRow;

use super::check_max_len;

/// A row from the `users` table.
///
/// The password hash and the optimistic-lock `version` are never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub created_at: Timestamp,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub activated: bool,
    #[serde(skip_serializing)]
    pub version: i32,
}

/// Fields required to insert a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub activated: bool,
}

/// Rules for the profile fields shared by registration and update.
pub fn validate_user_fields(
    v: &mut Validator,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) {
    v.check(!first_name.is_empty(), "first_name", "must be provided");
    check_max_len(v, "first_name", first_name, 500);

    v.check(!last_name.is_empty(), "last_name", "must be provided");
    check_max_len(v, "last_name", last_name, 500);

    v.check(
        email.is_empty() || valid_email(email),
        "email",
        "must be a valid email address",
    );

    v.check(!phone.is_empty(), "phone", "must be provided");
    v.check(
        matches(phone, &PHONE_RX),
        "phone",
        "must be a valid phone number",
    );
}

/// Rules for a plaintext password before it is hashed.
pub fn validate_password_plaintext(v: &mut Validator, password: &str) {
    v.check(!password.is_empty(), "password", "must be provided");
    v.check(
        password.len() >= 8,
        "password",
        "must be at least 8 bytes long",
    );
    v.check(
        password.len() <= 72,
        "password",
        "must not be more than 72 bytes long",
    );
}

impl User {
    pub fn validate(&self, v: &mut Validator) {
        validate_user_fields(
            v,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            created_at: chrono::Utc::now(),
            first_name: "Sara".into(),
            last_name: "Ahmadi".into(),
            email: String::new(),
            phone: "09123456789".into(),
            password_hash: "$argon2id$v=19$...".into(),
            activated: false,
            version: 1,
        }
    }

    #[test]
    fn valid_user_passes() {
        let mut v = Validator::new();
        user().validate(&mut v);
        assert!(v.valid());
    }

    #[test]
    fn bad_email_and_phone() {
        let mut v = Validator::new();
        User {
            email: "nope".into(),
            phone: "9123".into(),
            ..user()
        }
        .validate(&mut v);
        assert_eq!(
            v.errors().get("email"),
            Some("must be a valid email address")
        );
        assert_eq!(
            v.errors().get("phone"),
            Some("must be a valid phone number")
        );
    }

    #[test]
    fn password_length_bounds() {
        let mut v = Validator::new();
        validate_password_plaintext(&mut v, "short");
        assert_eq!(
            v.errors().get("password"),
            Some("must be at least 8 bytes long")
        );

        let mut v = Validator::new();
        validate_password_plaintext(&mut v, &"p".repeat(73));
        assert_eq!(
            v.errors().get("password"),
            Some("must not be more than 72 bytes long")
        );
    }

    #[test]
    fn secrets_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("version").is_none());
        assert!(json.get("email").is_none());
        assert_eq!(json["phone"], "09123456789");
    }
}
