//! Staff entity model and DTOs.
//!
//! A staff row is the person; their role history in a business lives in
//! `staff_assignments`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::DbId;
use bookline_core::validate::{self, Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::{double_option, Lifecycle, MaybeNull};

/// Full staff row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub business_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for Staff {
    const TABLE: &'static str = "staff";
    const COLUMNS: &'static str = "id, business_id, first_name, last_name, email, phone, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "Staff";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new staff member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaff {
    pub business_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Validate for CreateStaff {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate::require_non_empty(&mut errors, "first_name", &self.first_name);
        validate::require_non_empty(&mut errors, "last_name", &self.last_name);
        if let Some(email) = &self.email {
            validate::require_email(&mut errors, "email", email);
        }
        errors.into_result()
    }
}

/// DTO for updating a staff member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStaff {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: MaybeNull<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: MaybeNull<String>,
}

impl UpdateStaff {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

impl Validate for UpdateStaff {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(first_name) = &self.first_name {
            validate::require_non_empty(&mut errors, "first_name", first_name);
        }
        if let Some(last_name) = &self.last_name {
            validate::require_non_empty(&mut errors, "last_name", last_name);
        }
        if let Some(Some(email)) = &self.email {
            validate::require_email(&mut errors, "email", email);
        }
        errors.into_result()
    }
}
