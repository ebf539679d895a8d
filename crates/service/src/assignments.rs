//! Assignment workflows: the scoped-uniqueness state machine.
//!
//! Each pair moves through `no-record -> active -> ended`. Ending an
//! assignment stamps `end_date` and keeps the row as history; there is no
//! in-place reactivation -- assigning again inserts a fresh row, which is
//! permitted once no active row exists for the pair. The advisory
//! pre-checks here produce friendly conflict messages; the authoritative
//! enforcement is the partial unique index raced at insert time, so two
//! concurrent assigns resolve to exactly one winner.

use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::Business;
use bookline_db::models::service::Service;
use bookline_db::models::service_assignment::{CreateServiceAssignment, ServiceAssignment};
use bookline_db::models::staff::Staff;
use bookline_db::models::staff_assignment::{CreateStaffAssignment, StaffAssignment};
use bookline_db::repositories::{
    AuditLogRepo, BusinessRepo, ServiceAssignmentRepo, ServiceRepo, StaffAssignmentRepo, StaffRepo,
};

use crate::error::{map_sqlx_error, not_found};

/// Orchestrates staff-role and service assignments.
#[derive(Clone)]
pub struct AssignmentService {
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------
    // Staff assignments: (business, staff) pair
    // -----------------------------------------------------------------

    /// Start a staff assignment: `no-record -> active`.
    pub async fn assign_staff(
        &self,
        input: CreateStaffAssignment,
        actor: DbId,
    ) -> DomainResult<StaffAssignment> {
        input.validate()?;
        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;
        let staff = StaffRepo::find_by_id(&self.pool, input.staff_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Staff::NAME, input.staff_id))?;
        if staff.business_id != input.business_id {
            return Err(DomainError::invalid(
                "staff_id",
                "same_business",
                "staff belongs to another business",
            ));
        }

        if let Some(existing) = StaffAssignmentRepo::find_active(
            &self.pool,
            input.business_id,
            input.staff_id,
        )
        .await
        .map_err(map_sqlx_error)?
        {
            return Err(DomainError::Conflict(format!(
                "staff {} already has an active assignment in business {} since {}",
                input.staff_id, input.business_id, existing.start_date
            )));
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let assignment = StaffAssignmentRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(
                actor,
                actions::ASSIGNMENT_START,
                StaffAssignment::NAME,
                assignment.id,
            ),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(assignment)
    }

    /// End an active staff assignment: `active -> ended`. Ending an
    /// already-ended or unknown assignment is `NotFound`.
    pub async fn end_staff_assignment(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let ended = StaffAssignmentRepo::end(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !ended {
            return Err(not_found(StaffAssignment::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ASSIGNMENT_END, StaffAssignment::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// The currently-active assignment for a (business, staff) pair.
    pub async fn active_staff_assignment(
        &self,
        business_id: DbId,
        staff_id: DbId,
    ) -> DomainResult<Option<StaffAssignment>> {
        StaffAssignmentRepo::find_active(&self.pool, business_id, staff_id)
            .await
            .map_err(map_sqlx_error)
    }

    /// Full assignment history for a (business, staff) pair, oldest
    /// first.
    pub async fn staff_history(
        &self,
        business_id: DbId,
        staff_id: DbId,
    ) -> DomainResult<Vec<StaffAssignment>> {
        StaffAssignmentRepo::list_for_pair(&self.pool, business_id, staff_id)
            .await
            .map_err(map_sqlx_error)
    }

    // -----------------------------------------------------------------
    // Service assignments: (business, service) pair
    // -----------------------------------------------------------------

    /// Start a service assignment: `no-record -> active`.
    pub async fn assign_service(
        &self,
        input: CreateServiceAssignment,
        actor: DbId,
    ) -> DomainResult<ServiceAssignment> {
        input.validate()?;
        BusinessRepo::find_by_id(&self.pool, input.business_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Business::NAME, input.business_id))?;
        let service = ServiceRepo::find_by_id(&self.pool, input.service_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Service::NAME, input.service_id))?;
        let staff = StaffRepo::find_by_id(&self.pool, input.staff_id)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(Staff::NAME, input.staff_id))?;
        if service.business_id != input.business_id {
            return Err(DomainError::invalid(
                "service_id",
                "same_business",
                "service belongs to another business",
            ));
        }
        if staff.business_id != input.business_id {
            return Err(DomainError::invalid(
                "staff_id",
                "same_business",
                "staff belongs to another business",
            ));
        }

        if let Some(existing) = ServiceAssignmentRepo::find_active(
            &self.pool,
            input.business_id,
            input.service_id,
        )
        .await
        .map_err(map_sqlx_error)?
        {
            return Err(DomainError::Conflict(format!(
                "service {} already has an active assignment in business {} since {}",
                input.service_id, input.business_id, existing.start_date
            )));
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let assignment = ServiceAssignmentRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(
                actor,
                actions::ASSIGNMENT_START,
                ServiceAssignment::NAME,
                assignment.id,
            ),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(assignment)
    }

    /// End an active service assignment: `active -> ended`.
    pub async fn end_service_assignment(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let ended = ServiceAssignmentRepo::end(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !ended {
            return Err(not_found(ServiceAssignment::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ASSIGNMENT_END, ServiceAssignment::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Full assignment history for a (business, service) pair, oldest
    /// first.
    pub async fn service_history(
        &self,
        business_id: DbId,
        service_id: DbId,
    ) -> DomainResult<Vec<ServiceAssignment>> {
        ServiceAssignmentRepo::list_for_pair(&self.pool, business_id, service_id)
            .await
            .map_err(map_sqlx_error)
    }
}
