//! Audit-trail action constants.
//!
//! Every service-layer mutation records one of these actions alongside the
//! acting principal. Kept in `core` so repository tests can assert on them
//! without depending on the service crate.

/// Known action types for audit log entries.
pub mod actions {
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const ENTITY_DELETE: &str = "entity_delete";
    pub const ASSIGNMENT_START: &str = "assignment_start";
    pub const ASSIGNMENT_END: &str = "assignment_end";
    pub const USER_REGISTER: &str = "user_register";
}
