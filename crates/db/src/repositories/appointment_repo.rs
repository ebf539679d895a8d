//! Repository for the `appointments` table.

use sqlx::PgPool;

use bookline_core::pagination::Page;
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::appointment::{Appointment, CreateAppointment, UpdateAppointment};

/// Provides CRUD operations for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment, returning the created row. Status starts
    /// as `scheduled`.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateAppointment,
        actor: DbId,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments
                (id, business_id, client_id, staff_id, service_id, starts_at, ends_at, notes, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {}",
            Appointment::COLUMNS,
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(new_id())
            .bind(input.business_id)
            .bind(input.client_id)
            .bind(input.staff_id)
            .bind(input.service_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.notes)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an active appointment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        entity::find_by_id::<Appointment>(pool, id).await
    }

    /// List one page of a business's active appointments plus the total
    /// count, ordered by booking window start.
    pub async fn list_by_business(
        pool: &PgPool,
        business_id: DbId,
        page: Page,
    ) -> Result<(Vec<Appointment>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {} FROM appointments
             WHERE business_id = $1 AND deleted_at IS NULL
             ORDER BY starts_at, id
             LIMIT $2 OFFSET $3",
            Appointment::COLUMNS,
        );
        let rows = sqlx::query_as::<_, Appointment>(&query)
            .bind(business_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok((rows, total))
    }

    /// List all active appointments for a client, most recent first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM appointments
             WHERE client_id = $1 AND deleted_at IS NULL
             ORDER BY starts_at DESC, id",
            Appointment::COLUMNS,
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update an appointment. Only fields present in `input` are applied;
    /// `notes` can be explicitly cleared.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateAppointment,
        actor: DbId,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET
                staff_id = COALESCE($2, staff_id),
                starts_at = COALESCE($3, starts_at),
                ends_at = COALESCE($4, ends_at),
                status = COALESCE($5, status),
                notes = CASE WHEN $6 THEN $7 ELSE notes END,
                updated_at = NOW(),
                updated_by = $8
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            Appointment::COLUMNS,
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(input.staff_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.status)
            .bind(input.notes.is_some())
            .bind(input.notes.as_ref().and_then(|n| n.as_deref()))
            .bind(actor)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete an appointment. Returns `false` if absent or already
    /// deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<Appointment>(executor, id, actor).await
    }
}
