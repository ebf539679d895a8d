//! Generic entity lifecycle operations.
//!
//! Every persisted aggregate shares the same identity/audit/soft-delete
//! columns, so the lifecycle queries (lookup, paged listing, soft delete,
//! existence probes) are written once over the [`Entity`] contract instead
//! of being copied into each repository. Entity-specific SQL (inserts,
//! partial updates, typed finders) stays in the per-entity repositories.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use bookline_core::pagination::Page;
use bookline_core::types::DbId;

/// Storage contract implemented by every persisted entity.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Stable storage identifier (table name).
    const TABLE: &'static str;

    /// Column list shared across queries to avoid repetition.
    const COLUMNS: &'static str;

    /// Human-readable entity name used in error reporting.
    const NAME: &'static str;

    fn id(&self) -> DbId;
}

/// Find an active row by its primary key. Excludes soft-deleted rows.
pub async fn find_by_id<E: Entity>(pool: &PgPool, id: DbId) -> Result<Option<E>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
        E::COLUMNS,
        E::TABLE,
    );
    sqlx::query_as::<_, E>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a row by its primary key, including soft-deleted rows. Reserved
/// for audit/history reads.
pub async fn find_by_id_include_deleted<E: Entity>(
    pool: &PgPool,
    id: DbId,
) -> Result<Option<E>, sqlx::Error> {
    let query = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
    sqlx::query_as::<_, E>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List one page of active rows plus the total active count.
///
/// Ordering is by `(created_at, id)`: UUIDv7 ids are time-ordered, so the
/// pair is a stable total order and pages neither overlap nor gap absent
/// concurrent writes.
pub async fn list_page<E: Entity>(pool: &PgPool, page: Page) -> Result<(Vec<E>, i64), sqlx::Error> {
    let query = format!(
        "SELECT {} FROM {} WHERE deleted_at IS NULL
         ORDER BY created_at, id
         LIMIT $1 OFFSET $2",
        E::COLUMNS,
        E::TABLE,
    );
    let rows = sqlx::query_as::<_, E>(&query)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    let total = count_active::<E>(pool).await?;
    Ok((rows, total))
}

/// Count active rows.
pub async fn count_active<E: Entity>(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let query = format!("SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL", E::TABLE);
    sqlx::query_scalar(&query).fetch_one(pool).await
}

/// Probe whether any active row has `column = value`.
///
/// `column` is a compile-time constant supplied by the calling repository,
/// never user input.
pub async fn exists_by<E: Entity>(
    pool: &PgPool,
    column: &'static str,
    value: &str,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {column} = $1 AND deleted_at IS NULL)",
        E::TABLE,
    );
    sqlx::query_scalar(&query).bind(value).fetch_one(pool).await
}

/// Soft-delete a row: stamp `deleted_at`/`deleted_by` exactly once.
///
/// Takes any executor so the service layer can pair the deletion with its
/// audit entry in one transaction. Returns `false` when the row is absent
/// or already deleted -- the transition is one-directional and is never
/// re-applied.
pub async fn soft_delete<E: Entity>(
    executor: impl sqlx::PgExecutor<'_>,
    id: DbId,
    actor: DbId,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "UPDATE {} SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW(), updated_by = $2
         WHERE id = $1 AND deleted_at IS NULL",
        E::TABLE,
    );
    let result = sqlx::query(&query)
        .bind(id)
        .bind(actor)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
