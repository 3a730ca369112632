//! Resolution rule for get-or-insert on uniquely named rows.
//!
//! Countries and categories are keyed by name. A lookup by exact name may
//! return no row (insert one), one row (reuse it), or several. Several rows
//! mean the uniqueness constraint was bypassed somewhere; that is reported
//! as [`DuplicateName`] so the request fails with a server error instead of
//! silently picking one.

/// More than one row shares a name that must be unique.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{count} {entity} rows share the name '{name}'")]
pub struct DuplicateName {
    pub entity: &'static str,
    pub name: String,
    pub count: usize,
}

/// Reduce the rows matched for `name` to at most one.
///
/// `Ok(None)` means the caller should insert a new row.
pub fn resolve_unique<T>(
    entity: &'static str,
    name: &str,
    mut rows: Vec<T>,
) -> Result<Option<T>, DuplicateName> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        count => Err(DuplicateName {
            entity,
            name: name.to_string(),
            count,
        }),
    }
}
