//! Client entity model and DTOs. Clients are a business's customers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::DbId;
use bookline_core::validate::{self, Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::{double_option, Lifecycle, MaybeNull};

/// Full client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
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

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static str = "id, business_id, first_name, last_name, email, phone, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "Client";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub business_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Validate for CreateClient {
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

/// DTO for updating a client. `email` and `phone` can be explicitly
/// cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: MaybeNull<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: MaybeNull<String>,
}

impl UpdateClient {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

impl Validate for UpdateClient {
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
