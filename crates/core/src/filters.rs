//! List filters: pagination bounds, sort safelists, and response metadata.
//!
//! A [`Filters`] value carries the raw `page`, `page_size`, and `sort`
//! query parameters together with the resource's safelist of sortable
//! columns. Only strings taken from the safelist ever reach SQL; the
//! client's `sort` value is used solely to select one of them.

use serde::Serialize;

use crate::error::CoreError;
use crate::validator::{permitted_value, Validator};

/// Largest accepted `page` value.
pub const MAX_PAGE: i64 = 10_000_000;

/// Largest accepted `page_size` value.
pub const MAX_PAGE_SIZE: i64 = 100;

/// `page` used when the query string omits it.
pub const DEFAULT_PAGE: i64 = 1;

/// `page_size` used when the query string omits it.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Sort direction derived from the optional `-` prefix on a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: &'static [&'static str],
}

impl Filters {
    pub fn new(
        page: i64,
        page_size: i64,
        sort: impl Into<String>,
        sort_safelist: &'static [&'static str],
    ) -> Self {
        Self {
            page,
            page_size,
            sort: sort.into(),
            sort_safelist,
        }
    }

    pub fn validate(&self, v: &mut Validator) {
        v.check(self.page > 0, "page", "must be greater than zero");
        v.check(
            self.page <= MAX_PAGE,
            "page",
            "must be a maximum of 10 million",
        );
        v.check(self.page_size > 0, "page_size", "must be greater than zero");
        v.check(
            self.page_size <= MAX_PAGE_SIZE,
            "page_size",
            "must be a maximum of 100",
        );
        v.check(
            permitted_value(&self.sort.as_str(), self.sort_safelist),
            "sort",
            "invalid sort value",
        );
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The safelisted column for the current sort key, without its `-` prefix.
    ///
    /// Returns an internal error when the key is not in the safelist; callers
    /// are expected to have run [`Filters::validate`] first.
    pub fn sort_column(&self) -> Result<&'static str, CoreError> {
        self.sort_safelist
            .iter()
            .copied()
            .find(|safe| *safe == self.sort)
            .map(|safe| safe.trim_start_matches('-'))
            .ok_or_else(|| CoreError::Internal(format!("unsafe sort parameter: {}", self.sort)))
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// `ORDER BY` body for a query over `table`, with `id` as tiebreaker.
    ///
    /// ```
    /// use misarfeh_core::filters::Filters;
    ///
    /// let f = Filters::new(1, 20, "-title", &["id", "title", "-id", "-title"]);
    /// assert_eq!(f.order_by("shops").unwrap(), "shops.title DESC, shops.id ASC");
    /// ```
    pub fn order_by(&self, table: &str) -> Result<String, CoreError> {
        let column = self.sort_column()?;
        Ok(format!(
            "{table}.{column} {}, {table}.id ASC",
            self.sort_direction().as_sql()
        ))
    }
}

/// Pagination metadata returned alongside every list response.
///
/// Every field is zero (and omitted from JSON) when there are no records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

impl Metadata {
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 || page_size <= 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Escape `value` for use inside a `LIKE`/`ILIKE` pattern so that `%`, `_`
/// and `\` match themselves.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
