use crate::types::DbId;
use crate::validate::ValidationErrors;

/// Domain-level error taxonomy returned across the service boundary.
///
/// Every variant carries a stable machine-readable kind (the variant) plus
/// a human-readable message. Raw storage errors never cross this boundary;
/// the service layer classifies them into one of these kinds.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// The referenced entity is absent or soft-deleted.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or missing input. Enumerates every failing field.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A uniqueness or lifecycle invariant was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A multi-step workflow completed some steps but could not be rolled
    /// back cleanly. Names the steps that may have persisted.
    #[error("workflow partially completed (done: {completed:?}): {message}")]
    PartialFailure {
        completed: Vec<&'static str>,
        message: String,
    },

    /// The operation was cancelled or timed out before reaching storage.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// Unexpected storage or infrastructure fault. The underlying cause is
    /// logged; only a generic message is exposed outward.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for service-layer return values.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &'static str, rule: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation(ValidationErrors::single(field, rule, message))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}
