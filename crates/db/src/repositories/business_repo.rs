//! Repository for the `businesses` table.

use sqlx::PgPool;

use bookline_core::pagination::Page;
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::business::{Business, CreateBusiness, UpdateBusiness};

/// Provides CRUD operations for businesses.
pub struct BusinessRepo;

impl BusinessRepo {
    /// Insert a new business, returning the created row.
    ///
    /// The service layer resolves currency/timezone defaults before the
    /// call; the COALESCE here mirrors the column defaults as a backstop.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateBusiness,
        actor: DbId,
    ) -> Result<Business, sqlx::Error> {
        let query = format!(
            "INSERT INTO businesses (id, owner_id, name, currency, timezone, created_by, updated_by)
             VALUES ($1, $2, $3, COALESCE($4, 'USD'), COALESCE($5, 'UTC'), $6, $6)
             RETURNING {}",
            Business::COLUMNS,
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(new_id())
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.currency)
            .bind(&input.timezone)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Find an active business by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Business>, sqlx::Error> {
        entity::find_by_id::<Business>(pool, id).await
    }

    /// List one page of active businesses plus the total active count.
    pub async fn list(pool: &PgPool, page: Page) -> Result<(Vec<Business>, i64), sqlx::Error> {
        entity::list_page::<Business>(pool, page).await
    }

    /// List all active businesses owned by a user.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Business>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM businesses
             WHERE owner_id = $1 AND deleted_at IS NULL
             ORDER BY created_at, id",
            Business::COLUMNS,
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a business. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateBusiness,
        actor: DbId,
    ) -> Result<Option<Business>, sqlx::Error> {
        let query = format!(
            "UPDATE businesses SET
                name = COALESCE($2, name),
                currency = COALESCE($3, currency),
                timezone = COALESCE($4, timezone),
                updated_at = NOW(),
                updated_by = $5
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            Business::COLUMNS,
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.currency)
            .bind(&input.timezone)
            .bind(actor)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a business. Returns `false` if absent or already
    /// deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<Business>(executor, id, actor).await
    }
}
