//! Query-string readers for list endpoints.
//!
//! Missing parameters fall back to defaults. A present but malformed
//! integer or boolean is recorded on the [`Validator`] so it is reported
//! alongside every other invalid parameter instead of rejecting the
//! request outright.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use misarfeh_core::filters::{Filters, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use misarfeh_core::validator::Validator;

use crate::error::AppError;

/// Raw query-string parameters of a request.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) =
            Query::<HashMap<String, String>>::from_request_parts(parts, state).await?;
        Ok(Self(params))
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self(params)
    }
}

impl QueryParams {
    pub fn string(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Comma-separated values; empty entries are dropped.
    pub fn csv(&self, key: &str) -> Vec<String> {
        self.0
            .get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn int(&self, key: &str, default: i64, v: &mut Validator) -> i64 {
        self.optional_int(key, v).unwrap_or(default)
    }

    pub fn optional_int(&self, key: &str, v: &mut Validator) -> Option<i64> {
        let raw = self.0.get(key).filter(|value| !value.is_empty())?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                v.add_error(key, "must be an integer value");
                None
            }
        }
    }

    pub fn bool(&self, key: &str, default: bool, v: &mut Validator) -> bool {
        let Some(raw) = self.0.get(key).filter(|value| !value.is_empty()) else {
            return default;
        };
        match raw.as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                v.add_error(key, "must be a boolean value");
                default
            }
        }
    }

    /// `page`, `page_size`, and `sort` (default `id`) against `safelist`.
    ///
    /// The result still has to pass [`Filters::validate`].
    pub fn filters(&self, safelist: &'static [&'static str], v: &mut Validator) -> Filters {
        Filters::new(
            self.int("page", DEFAULT_PAGE, v),
            self.int("page_size", DEFAULT_PAGE_SIZE, v),
            self.string("sort", "id"),
            safelist,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFELIST: &[&str] = &["id", "-id"];

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    #[test]
    fn defaults_when_absent() {
        let mut v = Validator::new();
        let f = params(&[]).filters(SAFELIST, &mut v);
        assert!(v.valid());
        assert_eq!((f.page, f.page_size, f.sort.as_str()), (1, 20, "id"));
    }

    #[test]
    fn malformed_integer_is_a_field_error() {
        let mut v = Validator::new();
        let f = params(&[("page", "two")]).filters(SAFELIST, &mut v);
        assert_eq!(v.errors().get("page"), Some("must be an integer value"));
        assert_eq!(f.page, DEFAULT_PAGE);
    }

    #[test]
    fn csv_splits_and_trims() {
        let q = params(&[("countries", "Iran, Turkey,,")]);
        assert_eq!(q.csv("countries"), ["Iran", "Turkey"]);
        assert!(q.csv("categories").is_empty());
    }

    #[test]
    fn bool_parsing() {
        let mut v = Validator::new();
        assert!(params(&[("verified", "true")]).bool("verified", false, &mut v));
        assert!(!params(&[]).bool("verified", false, &mut v));
        assert!(v.valid());
        params(&[("verified", "yes")]).bool("verified", false, &mut v);
        assert_eq!(v.errors().get("verified"), Some("must be a boolean value"));
    }
}
