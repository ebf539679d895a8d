//! Staff workflows.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::Page;
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::Business;
use bookline_db::models::staff::{CreateStaff, Staff, UpdateStaff};
use bookline_db::repositories::{AuditLogRepo, BusinessRepo, StaffRepo};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates staff lifecycle workflows on top of [`StaffRepo`].
#[derive(Clone)]
pub struct StaffService {
    pool: PgPool,
}

impl StaffService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a staff member in an existing business.
    pub async fn create(&self, input: CreateStaff, actor: DbId) -> DomainResult<Staff> {
        input.validate()?;
        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let staff = StaffRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_CREATE, Staff::NAME, staff.id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(staff)
    }

    /// Fetch an active staff member.
    pub async fn get(&self, id: DbId) -> DomainResult<Staff> {
        StaffRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Staff::NAME, id))
    }

    /// Apply a partial update and return the read-back entity.
    pub async fn update(&self, id: DbId, input: UpdateStaff, actor: DbId) -> DomainResult<Staff> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let staff = StaffRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Staff::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, Staff::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(staff)
    }

    /// Soft-delete a staff member.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = StaffRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(Staff::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, Staff::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// List one page of a business's staff plus the total count.
    pub async fn list_by_business(
        &self,
        business_id: DbId,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<Staff>, i64)> {
        StaffRepo::list_by_business(&self.pool, business_id, Page::new(page, page_size))
            .await
            .map_err(map_sqlx_error)
    }
}
