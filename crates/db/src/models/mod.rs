//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, with its validation rules
//! - A `Deserialize` update DTO (all `Option` fields) applied field by field

pub mod category;
pub mod comment;
pub mod country;
pub mod image;
pub mod product;
pub mod seller;
pub mod shop;
pub mod shop_association;
pub mod user;

use misarfeh_core::validator::Validator;

/// Shared byte-length rule for free-text fields.
pub(crate) fn check_max_len(v: &mut Validator, field: &str, value: &str, max: usize) {
    v.check(
        value.len() <= max,
        field,
        &format!("must not be more than {max} bytes long"),
    );
}

/// Shared rule for the 1-5 entry name and URL lists on shops and products.
///
/// `what` is the singular noun used in the "at least one" message.
pub(crate) fn check_name_list(
    v: &mut Validator,
    field: &str,
    values: Option<&[String]>,
    what: &str,
) {
    let Some(values) = values else {
        v.add_error(field, "must be provided");
        return;
    };
    v.check(
        !values.is_empty(),
        field,
        &format!("must contain at least 1 {what}"),
    );
    v.check(
        values.len() <= 5,
        field,
        "must not contain more than 5 entries",
    );
    v.check(
        misarfeh_core::validator::unique(values),
        field,
        "must not contain duplicate values",
    );
    v.check(
        values.iter().all(|value| !value.is_empty()),
        field,
        "must not contain empty values",
    );
}

/// Patch fields that are absent or `null` leave the target unchanged.
pub(crate) fn patch<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}
