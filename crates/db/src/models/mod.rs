//! Entity models and DTOs.
//!
//! Each module holds the full row struct for one table plus its
//! `Create*`/`Update*` DTOs. Update DTOs follow PATCH semantics: absent
//! fields are untouched, and nullable columns use [`MaybeNull`] so an
//! explicit `null` is distinguishable from an absent field.

pub mod appointment;
pub mod audit_log;
pub mod business;
pub mod client;
pub mod service;
pub mod service_assignment;
pub mod staff;
pub mod staff_assignment;
pub mod user;

use serde::{Deserializer, Serialize};
use sqlx::FromRow;

use bookline_core::types::{DbId, Timestamp};

/// Audit and soft-delete columns embedded by every persisted row.
///
/// `deleted_at IS NULL` means the row is active; the transition to
/// deleted happens at most once and there is no undelete.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lifecycle {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: DbId,
    pub updated_by: DbId,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<DbId>,
}

/// Distinguishes "leave unchanged" (`None`) from "set to NULL"
/// (`Some(None)`) in PATCH inputs.
pub type MaybeNull<T> = Option<Option<T>>;

/// Deserializer for [`MaybeNull`] fields: a present `null` becomes
/// `Some(None)` instead of collapsing into the absent case.
pub fn double_option<'de, T, D>(de: D) -> Result<MaybeNull<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}
