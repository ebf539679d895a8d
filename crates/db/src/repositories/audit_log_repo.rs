//! Repository for the append-only `audit_log` table.

use sqlx::PgPool;

use bookline_core::types::{new_id, DbId};

use crate::models::audit_log::{AuditLogEntry, NewAuditLogEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, actor_id, action, entity_type, entity_id, detail, recorded_at";

/// Appends and reads audit trail entries. There is no update or delete
/// path; the trail is immutable.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry, returning the stored row.
    ///
    /// Takes any executor so service mutations can write the entry inside
    /// the same transaction as the change it records.
    pub async fn append(
        executor: impl sqlx::PgExecutor<'_>,
        entry: &NewAuditLogEntry,
    ) -> Result<AuditLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log (id, actor_id, action, entity_type, entity_id, detail)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLogEntry>(&query)
            .bind(new_id())
            .bind(entry.actor_id)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.detail)
            .fetch_one(executor)
            .await
    }

    /// Trail for one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY recorded_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, AuditLogEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
