//! Client workflows.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::{clamp_limit, Page, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::Business;
use bookline_db::models::client::{Client, CreateClient, UpdateClient};
use bookline_db::repositories::{AuditLogRepo, BusinessRepo, ClientRepo};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates client lifecycle workflows on top of [`ClientRepo`].
#[derive(Clone)]
pub struct ClientService {
    pool: PgPool,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a client in an existing business.
    pub async fn create(&self, input: CreateClient, actor: DbId) -> DomainResult<Client> {
        input.validate()?;
        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let client = ClientRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_CREATE, Client::NAME, client.id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(client)
    }

    /// Fetch an active client.
    pub async fn get(&self, id: DbId) -> DomainResult<Client> {
        ClientRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Client::NAME, id))
    }

    /// Apply a partial update and return the read-back entity.
    pub async fn update(&self, id: DbId, input: UpdateClient, actor: DbId) -> DomainResult<Client> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let client = ClientRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Client::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, Client::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(client)
    }

    /// Soft-delete a client.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = ClientRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(Client::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, Client::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// List one page of a business's clients plus the total count.
    pub async fn list_by_business(
        &self,
        business_id: DbId,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<Client>, i64)> {
        ClientRepo::list_by_business(&self.pool, business_id, Page::new(page, page_size))
            .await
            .map_err(map_sqlx_error)
    }

    /// Substring search over a business's clients.
    pub async fn search(
        &self,
        business_id: DbId,
        query: &str,
        limit: Option<i64>,
    ) -> DomainResult<Vec<Client>> {
        let term = query.trim();
        if term.is_empty() {
            return Err(DomainError::invalid(
                "query",
                "required",
                "search query must not be empty",
            ));
        }
        let limit = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        ClientRepo::search(&self.pool, business_id, term, limit)
            .await
            .map_err(map_sqlx_error)
    }
}
