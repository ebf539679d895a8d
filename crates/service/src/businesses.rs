//! Business workflows.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::defaults::Defaults;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::Page;
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::{Business, CreateBusiness, UpdateBusiness};
use bookline_db::models::user::User;
use bookline_db::repositories::{AuditLogRepo, BusinessRepo, UserRepo};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates business lifecycle workflows on top of [`BusinessRepo`].
#[derive(Clone)]
pub struct BusinessService {
    pool: PgPool,
    defaults: Defaults,
}

impl BusinessService {
    pub fn new(pool: PgPool, defaults: Defaults) -> Self {
        Self { pool, defaults }
    }

    /// Create a business for an existing user, applying currency and
    /// timezone defaults when unspecified.
    pub async fn create(&self, mut input: CreateBusiness, actor: DbId) -> DomainResult<Business> {
        input.validate()?;
        UserRepo::find_by_id(&self.pool, input.owner_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(User::NAME, input.owner_id))?;

        input
            .currency
            .get_or_insert_with(|| self.defaults.currency.clone());
        input
            .timezone
            .get_or_insert_with(|| self.defaults.timezone.clone());

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let business = BusinessRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_CREATE, Business::NAME, business.id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(business)
    }

    /// Fetch an active business.
    pub async fn get(&self, id: DbId) -> DomainResult<Business> {
        BusinessRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, id))
    }

    /// Apply a partial update and return the read-back entity.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateBusiness,
        actor: DbId,
    ) -> DomainResult<Business> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let business = BusinessRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, Business::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(business)
    }

    /// Soft-delete a business.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = BusinessRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(Business::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, Business::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// List one page of businesses plus the total active count.
    pub async fn list(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<Business>, i64)> {
        BusinessRepo::list(&self.pool, Page::new(page, page_size))
            .await
            .map_err(map_sqlx_error)
    }

    /// List all businesses owned by a user.
    pub async fn list_by_owner(&self, owner_id: DbId) -> DomainResult<Vec<Business>> {
        BusinessRepo::list_by_owner(&self.pool, owner_id)
            .await
            .map_err(map_sqlx_error)
    }
}
