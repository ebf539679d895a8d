//! Service-assignment model: which staff member currently provides a
//! service.
//!
//! Scoped record symmetric to staff assignments: at most one active row
//! per `(business_id, service_id)` pair, enforced by
//! `uq_service_assignments_active`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::{DbId, Timestamp};
use bookline_core::validate::{Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::Lifecycle;

/// Full service-assignment row from the `service_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceAssignment {
    pub id: DbId,
    pub business_id: DbId,
    pub service_id: DbId,
    pub staff_id: DbId,
    pub is_active: bool,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for ServiceAssignment {
    const TABLE: &'static str = "service_assignments";
    const COLUMNS: &'static str =
        "id, business_id, service_id, staff_id, is_active, start_date, end_date, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "ServiceAssignment";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for starting a new service assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceAssignment {
    pub business_id: DbId,
    pub service_id: DbId,
    pub staff_id: DbId,
}

impl Validate for CreateServiceAssignment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        // All fields are typed ids; referential checks happen in the
        // service layer against live rows.
        Ok(())
    }
}
