//! Translation of storage errors into the domain taxonomy.
//!
//! Callers of the service layer never see raw sqlx error types.

use bookline_core::error::DomainError;
use bookline_core::types::DbId;
use bookline_core::validate::ValidationErrors;

/// Classify a sqlx error into a domain error kind.
///
/// - Unique-constraint violations (23505) on `uq_`-prefixed constraints
///   map to `Conflict`: the scoped-uniqueness indexes and the active-email
///   index are the authoritative enforcers, raced at insert time.
/// - Foreign-key violations (23503) map to `Conflict`: services pre-check
///   references, so a raw FK error only happens on a delete/insert race.
/// - Check-constraint violations (23514) map to `Validation` naming the
///   constraint (one-sided window changes are only checkable in storage).
/// - Pool acquisition timeout maps to `Cancelled` so a saturated pool
///   fails fast instead of hanging the caller.
/// - Everything else maps to `Internal`; the cause is logged and only a
///   generic message crosses the boundary.
pub fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            match code.as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return DomainError::Conflict(format!(
                            "duplicate value violates unique constraint {constraint}"
                        ));
                    }
                }
                Some("23503") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    return DomainError::Conflict(format!(
                        "referenced row no longer exists (constraint {constraint})"
                    ));
                }
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    return DomainError::Validation(ValidationErrors::single(
                        "input",
                        "check",
                        format!("violates check constraint {constraint}"),
                    ));
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            DomainError::Internal("storage error".to_string())
        }
        sqlx::Error::PoolTimedOut => {
            DomainError::Cancelled("timed out acquiring a database connection".to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            DomainError::Internal("storage error".to_string())
        }
    }
}

/// Shorthand for the absent-or-soft-deleted case.
pub fn not_found(entity: &'static str, id: DbId) -> DomainError {
    DomainError::NotFound { entity, id }
}
