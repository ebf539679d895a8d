//! Repository for the `services` table.

use sqlx::PgPool;

use bookline_core::pagination::Page;
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::service::{CreateService, Service, UpdateService};

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service, returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateService,
        actor: DbId,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services
                (id, business_id, name, description, price_minor, currency, duration_minutes, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'USD'), $7, $8, $8)
             RETURNING {}",
            Service::COLUMNS,
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(new_id())
            .bind(input.business_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_minor)
            .bind(&input.currency)
            .bind(input.duration_minutes)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an active service by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        entity::find_by_id::<Service>(pool, id).await
    }

    /// List one page of a business's active services plus the total count.
    pub async fn list_by_business(
        pool: &PgPool,
        business_id: DbId,
        page: Page,
    ) -> Result<(Vec<Service>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {} FROM services
             WHERE business_id = $1 AND deleted_at IS NULL
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3",
            Service::COLUMNS,
        );
        let rows = sqlx::query_as::<_, Service>(&query)
            .bind(business_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total = sqlx::query_scalar(
            "SELECT COUNT(*) FROM services WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok((rows, total))
    }

    /// Update a service. Only fields present in `input` are applied;
    /// `description` can be explicitly cleared.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateService,
        actor: DbId,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                price_minor = COALESCE($5, price_minor),
                currency = COALESCE($6, currency),
                duration_minutes = COALESCE($7, duration_minutes),
                updated_at = NOW(),
                updated_by = $8
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            Service::COLUMNS,
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.price_minor)
            .bind(&input.currency)
            .bind(input.duration_minutes)
            .bind(actor)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a service. Returns `false` if absent or already
    /// deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<Service>(executor, id, actor).await
    }
}
