//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::{DbId, Timestamp};
use bookline_core::validate::{self, Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::{double_option, Lifecycle, MaybeNull};

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, email, first_name, last_name, phone, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "User";

    fn id(&self) -> DbId {
        self.id
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User representation for external responses, with derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            phone: user.phone,
            created_at: user.lifecycle.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate::require_email(&mut errors, "email", &self.email);
        validate::require_non_empty(&mut errors, "first_name", &self.first_name);
        validate::require_non_empty(&mut errors, "last_name", &self.last_name);
        errors.into_result()
    }
}

/// DTO for updating a user. Absent fields are untouched; `phone` can be
/// explicitly cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: MaybeNull<String>,
}

impl UpdateUser {
    /// `true` when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
    }
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(email) = &self.email {
            validate::require_email(&mut errors, "email", email);
        }
        if let Some(first_name) = &self.first_name {
            validate::require_non_empty(&mut errors, "first_name", first_name);
        }
        if let Some(last_name) = &self.last_name {
            validate::require_non_empty(&mut errors, "last_name", last_name);
        }
        errors.into_result()
    }
}
