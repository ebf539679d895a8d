//! Appointment workflows.
//!
//! Bookings reference four aggregates; all of them must be active and
//! belong to the same business before a row is written. Availability and
//! double-booking rules are out of scope for the lifecycle layer.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::Page;
use bookline_core::types::DbId;
use bookline_core::validate::{Validate, ValidationErrors};

use bookline_db::entity::Entity;
use bookline_db::models::appointment::{Appointment, CreateAppointment, UpdateAppointment};
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::Business;
use bookline_db::models::client::Client;
use bookline_db::models::service::Service;
use bookline_db::models::staff::Staff;
use bookline_db::repositories::{
    AppointmentRepo, AuditLogRepo, BusinessRepo, ClientRepo, ServiceRepo, StaffRepo,
};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates appointment lifecycle workflows on top of
/// [`AppointmentRepo`].
#[derive(Clone)]
pub struct AppointmentService {
    pool: PgPool,
}

impl AppointmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an appointment after verifying every referenced aggregate
    /// is active and belongs to the appointment's business.
    pub async fn create(&self, input: CreateAppointment, actor: DbId) -> DomainResult<Appointment> {
        input.validate()?;

        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;
        let client = ClientRepo::find_by_id(&self.pool, input.client_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Client::NAME, input.client_id))?;
        let staff = StaffRepo::find_by_id(&self.pool, input.staff_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Staff::NAME, input.staff_id))?;
        let service = ServiceRepo::find_by_id(&self.pool, input.service_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Service::NAME, input.service_id))?;

        let mut errors = ValidationErrors::new();
        if client.business_id != input.business_id {
            errors.push("client_id", "same_business", "client belongs to another business");
        }
        if staff.business_id != input.business_id {
            errors.push("staff_id", "same_business", "staff belongs to another business");
        }
        if service.business_id != input.business_id {
            errors.push("service_id", "same_business", "service belongs to another business");
        }
        errors.into_result()?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let appointment = AppointmentRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(
                actor,
                actions::ENTITY_CREATE,
                Appointment::NAME,
                appointment.id,
            ),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(appointment)
    }

    /// Fetch an active appointment.
    pub async fn get(&self, id: DbId) -> DomainResult<Appointment> {
        AppointmentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Appointment::NAME, id))
    }

    /// Apply a partial update and return the read-back entity. A
    /// one-sided window change that crosses the stored boundary is
    /// rejected by the table's CHECK constraint and surfaces as
    /// `Validation`; the both-fields case is caught up front.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateAppointment,
        actor: DbId,
    ) -> DomainResult<Appointment> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        if let Some(staff_id) = input.staff_id {
            let current = self.get(id).await?;
            let staff = StaffRepo::find_by_id(&self.pool, staff_id)
                .await
                .map_err(map_sqlx_error)?
                .ok_or_else(|| not_found(Staff::NAME, staff_id))?;
            if staff.business_id != current.business_id {
                return Err(DomainError::invalid(
                    "staff_id",
                    "same_business",
                    "staff belongs to another business",
                ));
            }
        }
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let appointment = AppointmentRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Appointment::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, Appointment::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(appointment)
    }

    /// Soft-delete an appointment.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = AppointmentRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(Appointment::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, Appointment::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// List one page of a business's appointments plus the total count.
    pub async fn list_by_business(
        &self,
        business_id: DbId,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<Appointment>, i64)> {
        AppointmentRepo::list_by_business(&self.pool, business_id, Page::new(page, page_size))
            .await
            .map_err(map_sqlx_error)
    }

    /// List a client's appointments, most recent first.
    pub async fn list_by_client(&self, client_id: DbId) -> DomainResult<Vec<Appointment>> {
        AppointmentRepo::list_by_client(&self.pool, client_id)
            .await
            .map_err(map_sqlx_error)
    }
}
