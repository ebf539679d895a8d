//! Field-level validation rules.
//!
//! Rules are plain functions over a [`ValidationErrors`] collector so that
//! one validation pass reports every failing field, not just the first.
//! There is no registry and no global state; entities implement
//! [`Validate`] by calling the rules they need.

use std::fmt;

/// Contract every persisted entity's input satisfies before storage is
/// touched: pure, no I/O.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A single failed rule, naming the field and the violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

/// Accumulates field errors across a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collector holding exactly one failure.
    pub fn single(field: &'static str, rule: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, rule, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, rule: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            rule,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Convert the pass into a result: `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {} ({})", e.field, e.rule, e.message)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

/// Require a non-empty string after trimming.
pub fn require_non_empty(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "required", format!("{field} must not be empty"));
    }
}

/// Require a plausible email shape: one `@`, non-empty local part, and a
/// domain containing a dot. Full RFC validation belongs to the upstream
/// identity provider; this guards against obviously broken input.
pub fn require_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    let ok = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace);
    if !ok {
        errors.push(field, "email", format!("{value:?} is not a valid email address"));
    }
}

/// Require an ISO 4217-shaped currency code: exactly three ASCII uppercase
/// letters.
pub fn require_currency_code(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(
            field,
            "currency_code",
            format!("{value:?} is not a 3-letter uppercase currency code"),
        );
    }
}

/// Require a strictly positive integer (prices in minor units, durations
/// in minutes).
pub fn require_positive(errors: &mut ValidationErrors, field: &'static str, value: i64) {
    if value <= 0 {
        errors.push(field, "positive", format!("{field} must be greater than zero, got {value}"));
    }
}

/// Require a value inside an inclusive range.
pub fn require_range(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) {
    if value < min || value > max {
        errors.push(
            field,
            "range",
            format!("{field} must be between {min} and {max}, got {value}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(f: impl FnOnce(&mut ValidationErrors)) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        f(&mut errors);
        errors
    }

    #[test]
    fn test_non_empty_accepts_text() {
        assert!(run(|e| require_non_empty(e, "name", "Ada")).is_empty());
    }

    #[test]
    fn test_non_empty_rejects_blank_and_whitespace() {
        assert!(!run(|e| require_non_empty(e, "name", "")).is_empty());
        assert!(!run(|e| require_non_empty(e, "name", "   ")).is_empty());
    }

    #[test]
    fn test_email_shapes() {
        assert!(run(|e| require_email(e, "email", "a@x.com")).is_empty());
        assert!(!run(|e| require_email(e, "email", "ax.com")).is_empty());
        assert!(!run(|e| require_email(e, "email", "a@xcom")).is_empty());
        assert!(!run(|e| require_email(e, "email", "@x.com")).is_empty());
        assert!(!run(|e| require_email(e, "email", "a@x.com ")).is_empty());
        assert!(!run(|e| require_email(e, "email", "a@.com")).is_empty());
    }

    #[test]
    fn test_currency_code() {
        assert!(run(|e| require_currency_code(e, "currency", "USD")).is_empty());
        assert!(!run(|e| require_currency_code(e, "currency", "usd")).is_empty());
        assert!(!run(|e| require_currency_code(e, "currency", "US")).is_empty());
        assert!(!run(|e| require_currency_code(e, "currency", "USDD")).is_empty());
    }

    #[test]
    fn test_positive_and_range() {
        assert!(run(|e| require_positive(e, "price", 1)).is_empty());
        assert!(!run(|e| require_positive(e, "price", 0)).is_empty());
        assert!(!run(|e| require_positive(e, "price", -5)).is_empty());
        assert!(run(|e| require_range(e, "duration", 30, 5, 480)).is_empty());
        assert!(!run(|e| require_range(e, "duration", 481, 5, 480)).is_empty());
    }

    #[test]
    fn test_all_failures_reported_in_one_pass() {
        let mut errors = ValidationErrors::new();
        require_non_empty(&mut errors, "first_name", "");
        require_email(&mut errors, "email", "nope");
        require_currency_code(&mut errors, "currency", "x");
        assert_eq!(errors.errors().len(), 3);
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["first_name", "email", "currency"]);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::single("f", "required", "boom")
            .into_result()
            .is_err());
    }
}
