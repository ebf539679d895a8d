//! Repository for the `users` table.

use sqlx::PgPool;

use bookline_core::pagination::{escape_like, Page};
use bookline_core::types::{new_id, DbId};

use crate::entity::{self, Entity};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Takes any executor so workflows can run it inside a transaction.
    /// A duplicate active email collides with `uq_users_email_active`.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateUser,
        actor: DbId,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, first_name, last_name, phone, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {}",
            User::COLUMNS,
        );
        sqlx::query_as::<_, User>(&query)
            .bind(new_id())
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(actor)
            .fetch_one(executor)
            .await
    }

    /// Insert a self-registered user: the row's own id becomes the acting
    /// principal on its audit stamps.
    pub async fn create_self_registered(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, first_name, last_name, phone, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $1, $1)
             RETURNING {}",
            User::COLUMNS,
        );
        sqlx::query_as::<_, User>(&query)
            .bind(new_id())
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .fetch_one(executor)
            .await
    }

    /// Find an active user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        entity::find_by_id::<User>(pool, id).await
    }

    /// Find an active user by email (case-insensitive, matching the
    /// uniqueness index expression).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1) AND deleted_at IS NULL",
            User::COLUMNS,
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// `true` if an active user already holds the given email.
    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1) AND deleted_at IS NULL)",
        )
        .bind(email)
        .fetch_one(pool)
        .await
    }

    /// List one page of active users plus the total active count.
    pub async fn list(pool: &PgPool, page: Page) -> Result<(Vec<User>, i64), sqlx::Error> {
        entity::list_page::<User>(pool, page).await
    }

    /// Case-insensitive substring search over email and names.
    pub async fn search(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(term));
        let query = format!(
            "SELECT {} FROM users
             WHERE deleted_at IS NULL
               AND (email ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1)
             ORDER BY created_at, id
             LIMIT $2",
            User::COLUMNS,
        );
        sqlx::query_as::<_, User>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only fields present in `input` are applied; a
    /// present `phone: null` clears the column. Re-stamps
    /// `updated_at`/`updated_by`.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        input: &UpdateUser,
        actor: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone = CASE WHEN $5 THEN $6 ELSE phone END,
                updated_at = NOW(),
                updated_by = $7
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            User::COLUMNS,
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.phone.is_some())
            .bind(input.phone.as_ref().and_then(|p| p.as_deref()))
            .bind(actor)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a user. Returns `false` if absent or already deleted.
    pub async fn soft_delete(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        actor: DbId,
    ) -> Result<bool, sqlx::Error> {
        entity::soft_delete::<User>(executor, id, actor).await
    }
}
