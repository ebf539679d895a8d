//! Service entity model and DTOs: the offerings a business sells.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bookline_core::types::DbId;
use bookline_core::validate::{self, Validate, ValidationErrors};

use crate::entity::Entity;
use crate::models::{double_option, Lifecycle, MaybeNull};

/// Shortest bookable service, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 5;

/// Longest bookable service, in minutes (a full working day).
pub const MAX_DURATION_MINUTES: i64 = 480;

/// Full service row from the `services` table. Prices are integer minor
/// units (cents).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub business_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: String,
    pub duration_minutes: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Entity for Service {
    const TABLE: &'static str = "services";
    const COLUMNS: &'static str =
        "id, business_id, name, description, price_minor, currency, duration_minutes, \
        created_at, updated_at, created_by, updated_by, deleted_at, deleted_by";
    const NAME: &'static str = "Service";

    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new service. Currency falls back to the service-layer
/// default when unspecified.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub business_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub currency: Option<String>,
    pub duration_minutes: i32,
}

impl Validate for CreateService {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate::require_non_empty(&mut errors, "name", &self.name);
        validate::require_positive(&mut errors, "price_minor", self.price_minor);
        if let Some(currency) = &self.currency {
            validate::require_currency_code(&mut errors, "currency", currency);
        }
        validate::require_range(
            &mut errors,
            "duration_minutes",
            i64::from(self.duration_minutes),
            MIN_DURATION_MINUTES,
            MAX_DURATION_MINUTES,
        );
        errors.into_result()
    }
}

/// DTO for updating a service. `description` can be explicitly cleared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: MaybeNull<String>,
    pub price_minor: Option<i64>,
    pub currency: Option<String>,
    pub duration_minutes: Option<i32>,
}

impl UpdateService {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_minor.is_none()
            && self.currency.is_none()
            && self.duration_minutes.is_none()
    }
}

impl Validate for UpdateService {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            validate::require_non_empty(&mut errors, "name", name);
        }
        if let Some(price_minor) = self.price_minor {
            validate::require_positive(&mut errors, "price_minor", price_minor);
        }
        if let Some(currency) = &self.currency {
            validate::require_currency_code(&mut errors, "currency", currency);
        }
        if let Some(duration) = self.duration_minutes {
            validate::require_range(
                &mut errors,
                "duration_minutes",
                i64::from(duration),
                MIN_DURATION_MINUTES,
                MAX_DURATION_MINUTES,
            );
        }
        errors.into_result()
    }
}
