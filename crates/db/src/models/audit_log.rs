//! Audit log model. Entries are append-only and immutable: no lifecycle
//! columns, no update or delete path.

use serde::Serialize;
use sqlx::FromRow;

use bookline_core::types::{DbId, Timestamp};

/// Full audit entry row from the `audit_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub actor_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub detail: Option<serde_json::Value>,
    pub recorded_at: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub actor_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub detail: Option<serde_json::Value>,
}

impl NewAuditLogEntry {
    /// Entry with no extra detail payload.
    pub fn of(actor_id: DbId, action: &str, entity_type: &str, entity_id: DbId) -> Self {
        Self {
            actor_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            detail: None,
        }
    }
}
