//! Repository for the `staff` table.

use sqlx::PgPool;

use bookline_core::pagination::Page;
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::staff::{CreateStaff, Staff, UpdateStaff};

/// Provides CRUD operations for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Insert a new staff member, returning the created row.
    ///
    /// Takes any executor so the registration workflow can run it inside
    /// a transaction.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateStaff,
        actor: DbId,
    ) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (id, business_id, first_name, last_name, email, phone, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {}",
            Staff::COLUMNS,
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(new_id())
            .bind(input.business_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an active staff member by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        entity::find_by_id::<Staff>(pool, id).await
    }

    /// List one page of a business's active staff plus the total count.
    pub async fn list_by_business(
        pool: &PgPool,
        business_id: DbId,
        page: Page,
    ) -> Result<(Vec<Staff>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {} FROM staff
             WHERE business_id = $1 AND deleted_at IS NULL
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3",
            Staff::COLUMNS,
        );
        let rows = sqlx::query_as::<_, Staff>(&query)
            .bind(business_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total = sqlx::query_scalar(
            "SELECT COUNT(*) FROM staff WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok((rows, total))
    }

    /// Update a staff member. Only fields present in `input` are applied;
    /// `email`/`phone` can be explicitly cleared.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateStaff,
        actor: DbId,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "UPDATE staff SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = CASE WHEN $4 THEN $5 ELSE email END,
                phone = CASE WHEN $6 THEN $7 ELSE phone END,
                updated_at = NOW(),
                updated_by = $8
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            Staff::COLUMNS,
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.email.is_some())
            .bind(input.email.as_ref().and_then(|e| e.as_deref()))
            .bind(input.phone.is_some())
            .bind(input.phone.as_ref().and_then(|p| p.as_deref()))
            .bind(actor)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a staff member. Returns `false` if absent or already
    /// deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<Staff>(executor, id, actor).await
    }
}
