//! Repository for the `staff_assignments` table.
//!
//! The check-and-insert for the "one active assignment per
//! (business, staff) pair" invariant is atomic at the storage level:
//! `create` races on `uq_staff_assignments_active`, so of two concurrent
//! creates exactly one succeeds and the other surfaces a unique-constraint
//! violation.

use sqlx::PgPool;

use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::staff_assignment::{CreateStaffAssignment, StaffAssignment};

/// Provides lifecycle operations for staff assignments.
pub struct StaffAssignmentRepo;

impl StaffAssignmentRepo {
    /// Insert a new active assignment, returning the created row.
    ///
    /// Fails with a `uq_staff_assignments_active` violation when the pair
    /// already has an active assignment.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateStaffAssignment,
        actor: DbId,
    ) -> Result<StaffAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff_assignments (id, business_id, staff_id, role, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {}",
            StaffAssignment::COLUMNS,
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(new_id())
            .bind(input.business_id)
            .bind(input.staff_id)
            .bind(&input.role)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an assignment by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StaffAssignment>, sqlx::Error> {
        entity::find_by_id::<StaffAssignment>(pool, id).await
    }

    /// Find the currently-active assignment for a (business, staff) pair,
    /// if any.
    pub async fn find_active(
        pool: &PgPool,
        business_id: DbId,
        staff_id: DbId,
    ) -> Result<Option<StaffAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM staff_assignments
             WHERE business_id = $1 AND staff_id = $2
               AND is_active AND end_date IS NULL AND deleted_at IS NULL",
            StaffAssignment::COLUMNS,
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(business_id)
            .bind(staff_id)
            .fetch_optional(pool)
            .await
    }

    /// Full history for a (business, staff) pair: active and ended rows,
    /// oldest first.
    pub async fn list_for_pair(
        pool: &PgPool,
        business_id: DbId,
        staff_id: DbId,
    ) -> Result<Vec<StaffAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM staff_assignments
             WHERE business_id = $1 AND staff_id = $2 AND deleted_at IS NULL
             ORDER BY start_date, id",
            StaffAssignment::COLUMNS,
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(business_id)
            .bind(staff_id)
            .fetch_all(pool)
            .await
    }

    /// All currently-active assignments in a business.
    pub async fn list_active_by_business(
        pool: &PgPool,
        business_id: DbId,
    ) -> Result<Vec<StaffAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM staff_assignments
             WHERE business_id = $1
               AND is_active AND end_date IS NULL AND deleted_at IS NULL
             ORDER BY start_date, id",
            StaffAssignment::COLUMNS,
        );
        sqlx::query_as::<_, StaffAssignment>(&query)
            .bind(business_id)
            .fetch_all(pool)
            .await
    }

    /// End an active assignment: stamp `end_date`, drop `is_active`.
    ///
    /// Historical rows are never mutated again; re-activation inserts a
    /// fresh row instead. Returns `false` if the row is not currently
    /// active.
    pub async fn end(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE staff_assignments
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
        entity::soft_delete::<StaffAssignment>(executor, id, actor).await
    }
}
