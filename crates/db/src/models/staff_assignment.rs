//! Staff-assignment model: a staff member's role in a business.
//!
//! Scoped record: for a `(business_id, staff_id)` pair at most one row may
//! be active (`is_active AND end_date IS NULL`) at a time; ended rows
//! accumulate as history. Enforced by `uq_staff_assignments_active`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::roles::is_valid_role;
use bookline_core::types::{DbId, Timestamp};
use bookline_core::validate::{Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::Lifecycle;

/// Full staff-assignment row from the `staff_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffAssignment {
    pub id: DbId,
    pub business_id: DbId,
    pub staff_id: DbId,
    pub role: String,
    pub is_active: bool,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for StaffAssignment {
    const TABLE: &'static str = "staff_assignments";
    const COLUMNS: &'static str =
        "id, business_id, staff_id, role, is_active, start_date, end_date, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "StaffAssignment";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for starting a new assignment. There is no update DTO: an
/// assignment is either ended (stamping `end_date`) or superseded by a
/// fresh row; historical rows are never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffAssignment {
    pub business_id: DbId,
    pub staff_id: DbId,
    pub role: String,
}

impl Validate for CreateStaffAssignment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_role(&self.role) {
            errors.push("role", "role", format!("{:?} is not a valid role", self.role));
        }
        errors.into_result()
    }
}
