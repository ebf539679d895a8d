//! Service-catalog workflows: the services a business offers.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::defaults::Defaults;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::Page;
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::Business;
use bookline_db::models::service::{CreateService, Service, UpdateService};
use bookline_db::repositories::{AuditLogRepo, BusinessRepo, ServiceRepo};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates service-catalog workflows on top of [`ServiceRepo`].
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    defaults: Defaults,
}

impl CatalogService {
    pub fn new(pool: PgPool, defaults: Defaults) -> Self {
        Self { pool, defaults }
    }

    /// Create a service in an existing business. The price currency
    /// defaults to the business-wide default when unspecified.
    pub async fn create(&self, mut input: CreateService, actor: DbId) -> DomainResult<Service> {
        input.validate()?;
        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;

        input
            .currency
            .get_or_insert_with(|| self.defaults.currency.clone());

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let service = ServiceRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_CREATE, Service::NAME, service.id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(service)
    }

    /// Fetch an active service.
    pub async fn get(&self, id: DbId) -> DomainResult<Service> {
        ServiceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Service::NAME, id))
    }

    /// Apply a partial update and return the read-back entity.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateService,
        actor: DbId,
    ) -> DomainResult<Service> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let service = ServiceRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Service::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, Service::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(service)
    }

    /// Soft-delete a service.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = ServiceRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(Service::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, Service::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// List one page of a business's services plus the total count.
    pub async fn list_by_business(
        &self,
        business_id: DbId,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<Service>, i64)> {
        ServiceRepo::list_by_business(&self.pool, business_id, Page::new(page, page_size))
            .await
            .map_err(map_sqlx_error)
    }
}
