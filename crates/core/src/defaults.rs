//! Cross-field default values applied by the service layer.

/// Currency applied to a business when none is specified.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Timezone applied to a business when none is specified.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Status a freshly created appointment starts in.
pub const DEFAULT_APPOINTMENT_STATUS: &str = "scheduled";

/// Set of valid appointment status strings.
pub const APPOINTMENT_STATUSES: &[&str] = &["scheduled", "completed", "cancelled", "no_show"];

/// Returns `true` if the given appointment status string is valid.
pub fn is_valid_appointment_status(status: &str) -> bool {
    APPOINTMENT_STATUSES.contains(&status)
}

/// Immutable default bundle constructed at startup and handed to the
/// service layer. Never read from global state.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub currency: String,
    pub timezone: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Name for the business auto-provisioned when a user registers.
pub fn default_business_name(first_name: &str) -> String {
    format!("{first_name}'s Business")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_appointment_statuses() {
        assert!(is_valid_appointment_status("scheduled"));
        assert!(is_valid_appointment_status("no_show"));
        assert!(!is_valid_appointment_status("SCHEDULED"));
        assert!(!is_valid_appointment_status(""));
    }

    #[test]
    fn test_default_status_is_valid() {
        assert!(is_valid_appointment_status(DEFAULT_APPOINTMENT_STATUS));
    }

    #[test]
    fn test_default_business_name() {
        assert_eq!(default_business_name("Ada"), "Ada's Business");
    }
}
