//! Business entity model and DTOs. Businesses are the tenant root.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::DbId;
use bookline_core::validate::{self, Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::Lifecycle;

/// Full business row from the `businesses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Business {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub currency: String,
    pub timezone: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for Business {
    const TABLE: &'static str = "businesses";
    const COLUMNS: &'static str = "id, owner_id, name, currency, timezone, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "Business";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new business. Currency and timezone fall back to
/// the service-layer defaults when unspecified.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusiness {
    pub owner_id: DbId,
    pub name: String,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

impl Validate for CreateBusiness {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate::require_non_empty(&mut errors, "name", &self.name);
        if let Some(currency) = &self.currency {
            validate::require_currency_code(&mut errors, "currency", currency);
        }
        if let Some(timezone) = &self.timezone {
            validate::require_non_empty(&mut errors, "timezone", timezone);
        }
        errors.into_result()
    }
}

/// DTO for updating a business. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBusiness {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

impl UpdateBusiness {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.currency.is_none() && self.timezone.is_none()
    }
}

impl Validate for UpdateBusiness {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            validate::require_non_empty(&mut errors, "name", name);
        }
        if let Some(currency) = &self.currency {
            validate::require_currency_code(&mut errors, "currency", currency);
        }
        if let Some(timezone) = &self.timezone {
            validate::require_non_empty(&mut errors, "timezone", timezone);
        }
        errors.into_result()
    }
}
