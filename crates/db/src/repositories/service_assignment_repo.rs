//! Repository for the `service_assignments` table.
//!
//! Mirrors the staff-assignment invariant for the (business, service)
//! pair via `uq_service_assignments_active`.

use sqlx::PgPool;

use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::service_assignment::{CreateServiceAssignment, ServiceAssignment};

/// Provides lifecycle operations for service assignments.
pub struct ServiceAssignmentRepo;

impl ServiceAssignmentRepo {
    /// Insert a new active assignment, returning the created row.
    ///
    /// Fails with a `uq_service_assignments_active` violation when the
    /// pair already has an active assignment.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateServiceAssignment,
        actor: DbId,
    ) -> Result<ServiceAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_assignments (id, business_id, service_id, staff_id, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {}",
            ServiceAssignment::COLUMNS,
        );
        sqlx::query_as::<_, ServiceAssignment>(&query)
            .bind(new_id())
            .bind(input.business_id)
            .bind(input.service_id)
            .bind(input.staff_id)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an assignment by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceAssignment>, sqlx::Error> {
        entity::find_by_id::<ServiceAssignment>(pool, id).await
    }

    /// Find the currently-active assignment for a (business, service)
    /// pair, if any.
    pub async fn find_active(
        pool: &PgPool,
        business_id: DbId,
        service_id: DbId,
    ) -> Result<Option<ServiceAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM service_assignments
             WHERE business_id = $1 AND service_id = $2
               AND is_active AND end_date IS NULL AND deleted_at IS NULL",
            ServiceAssignment::COLUMNS,
        );
        sqlx::query_as::<_, ServiceAssignment>(&query)
            .bind(business_id)
            .bind(service_id)
            .fetch_optional(pool)
            .await
    }

    /// Full history for a (business, service) pair, oldest first.
    pub async fn list_for_pair(
        pool: &PgPool,
        business_id: DbId,
        service_id: DbId,
    ) -> Result<Vec<ServiceAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM service_assignments
             WHERE business_id = $1 AND service_id = $2 AND deleted_at IS NULL
             ORDER BY start_date, id",
            ServiceAssignment::COLUMNS,
        );
        sqlx::query_as::<_, ServiceAssignment>(&query)
            .bind(business_id)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }

    /// End an active assignment. Returns `false` if the row is not
    /// currently active.
    pub async fn end(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE service_assignments
             SET is_active = FALSE, end_date = NOW(), updated_at = NOW(), updated_by = $2
             WHERE id = $1 AND is_active AND end_date IS NULL AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(actor)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete an assignment record. Returns `false` if absent or
    /// already deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<ServiceAssignment>(executor, id, actor).await
    }
}
