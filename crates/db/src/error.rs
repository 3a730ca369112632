//! Typed storage errors.
//!
//! Driver errors are classified once, here, by SQLSTATE and constraint
//! name. Callers match on variants instead of inspecting message text.

use misarfeh_core::dedup::DuplicateName;
use misarfeh_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique index or primary key rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key rejected the write (missing parent or referenced child).
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// An optimistic version check matched no row.
    #[error("Edit conflict")]
    EditConflict,

    /// Rows that must be unique by name were found duplicated.
    #[error("Inconsistent data: {0}")]
    Inconsistent(#[from] DuplicateName),

    /// A domain rule failed while building a query (e.g. an unsafe sort key).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other driver error.
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return DbError::UniqueViolation { constraint },
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DbError::ForeignKeyViolation { constraint }
                }
                _ => {}
            }
        }
        DbError::Sqlx(err)
    }
}

impl DbError {
    /// Name of the violated constraint, if this is a constraint error.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::UniqueViolation { constraint }
            | DbError::ForeignKeyViolation { constraint } => Some(constraint),
            _ => None,
        }
    }
}
