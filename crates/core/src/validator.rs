//! Accumulating field validator.
//!
//! Checks never short-circuit: every failing field is recorded so a client
//! receives the complete list of problems in one response. Only the first
//! message recorded for a field is kept.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use ::validator::ValidateEmail;

use crate::error::CoreError;

/// Mobile numbers: eleven digits starting with `09`.
pub static PHONE_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09\d{9}$").expect("valid regex"));

/// National identification code: exactly ten digits.
pub static MELI_CODE_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));

/// Field name to message map, serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a single-field error set (used for constraint violations that
    /// surface as validation failures).
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.0.insert(field.to_string(), message.to_string());
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Collects field errors across any number of checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no check has failed.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Convert the accumulated state into a result.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// `true` if every value in the slice is distinct.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v))
}

/// `true` if the whole string matches `rx`.
pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

/// `true` if `value` is one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// Syntactic e-mail address check.
pub fn valid_email(value: &str) -> bool {
    value.validate_email()
}

/// Shared rule for the `09xxxxxxxxx` contact numbers on shops and comments.
///
/// Reports "must be provided" for an empty value, then length, then prefix.
pub fn check_contact_phone(v: &mut Validator, field: &str, phone: &str) {
    v.check(!phone.is_empty(), field, "must be provided");
    v.check(phone.len() == 11, field, "must be 11 bytes long");
    v.check(phone.starts_with("09"), field, "must be start with 09");
}
