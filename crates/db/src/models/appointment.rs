//! Appointment entity model and DTOs.
//!
//! An appointment records a client booked with a staff member for a
//! service. Availability and scheduling rules are out of scope here; the
//! lifecycle layer treats the booking window as opaque payload beyond the
//! start-before-end check.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::defaults::is_valid_appointment_status;
use bookline_core::types::{DbId, Timestamp};
use bookline_core::validate::{Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::{double_option, Lifecycle, MaybeNull};

/// Full appointment row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub business_id: DbId,
    pub client_id: DbId,
    pub staff_id: DbId,
    pub service_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: String,
    pub notes: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const COLUMNS: &'static str =
        "id, business_id, client_id, staff_id, service_id, starts_at, ends_at, status, notes, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "Appointment";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new appointment. Status starts as `scheduled`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub business_id: DbId,
    pub client_id: DbId,
    pub staff_id: DbId,
    pub service_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub notes: Option<String>,
}

impl Validate for CreateAppointment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.ends_at <= self.starts_at {
            errors.push(
                "ends_at",
                "after_start",
                format!("ends_at ({}) must be after starts_at ({})", self.ends_at, self.starts_at),
            );
        }
        errors.into_result()
    }
}

/// DTO for updating an appointment. `notes` can be explicitly cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointment {
    pub staff_id: Option<DbId>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: MaybeNull<String>,
}

impl UpdateAppointment {
    pub fn is_empty(&self) -> bool {
        self.staff_id.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

impl Validate for UpdateAppointment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(status) = &self.status {
            if !is_valid_appointment_status(status) {
                errors.push("status", "status", format!("{status:?} is not a valid status"));
            }
        }
        // A one-sided window change is checked against the stored row by
        // the repository's CHECK constraint; only the both-present case
        // can be rejected before touching storage.
        if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at) {
            if ends_at <= starts_at {
                errors.push(
                    "ends_at",
                    "after_start",
                    format!("ends_at ({ends_at}) must be after starts_at ({starts_at})"),
                );
            }
        }
        errors.into_result()
    }
}
