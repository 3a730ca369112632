use crate::types::DbId;
use crate::validator::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The row changed between read and write (optimistic version check).
    #[error("Unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("Internal error: {0}")]
    Internal(String),
}
