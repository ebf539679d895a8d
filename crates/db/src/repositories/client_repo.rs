//! Repository for the `clients` table.

use sqlx::PgPool;

use bookline_core::pagination::{escape_like, Page};
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::client::{Client, CreateClient, UpdateClient};

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateClient,
        actor: DbId,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (id, business_id, first_name, last_name, email, phone, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {}",
            Client::COLUMNS,
        );
        sqlx::query_as::<_, Client>(&query)
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

    /// Find an active client by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        entity::find_by_id::<Client>(pool, id).await
    }

    /// Find an active client of a business by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        business_id: DbId,
        email: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM clients
             WHERE business_id = $1 AND lower(email) = lower($2) AND deleted_at IS NULL",
            Client::COLUMNS,
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List one page of a business's active clients plus the total count.
    pub async fn list_by_business(
        pool: &PgPool,
        business_id: DbId,
        page: Page,
    ) -> Result<(Vec<Client>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {} FROM clients
             WHERE business_id = $1 AND deleted_at IS NULL
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3",
            Client::COLUMNS,
        );
        let rows = sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clients WHERE business_id = $1 AND deleted_at IS NULL",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await?;
        Ok((rows, total))
    }

    /// Case-insensitive substring search over a business's clients.
    pub async fn search(
        pool: &PgPool,
        business_id: DbId,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(term));
        let query = format!(
            "SELECT {} FROM clients
             WHERE business_id = $1 AND deleted_at IS NULL
               AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2)
             ORDER BY created_at, id
             LIMIT $3",
            Client::COLUMNS,
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(business_id)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only fields present in `input` are applied;
    /// `email`/`phone` can be explicitly cleared.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateClient,
        actor: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = CASE WHEN $4 THEN $5 ELSE email END,
                phone = CASE WHEN $6 THEN $7 ELSE phone END,
                updated_at = NOW(),
                updated_by = $8
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            Client::COLUMNS,
        );
        sqlx::query_as::<_, Client>(&query)
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

    /// Soft-delete a client. Returns `false` if absent or already deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<Client>(executor, id, actor).await
    }
}
