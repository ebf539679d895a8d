//! Well-known staff-assignment role names.
//!
//! These must match the seed expectations in the assignment migrations.

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_STAFF: &str = "staff";

/// Set of valid role strings for a staff assignment.
pub const VALID_ROLES: &[&str] = &[ROLE_OWNER, ROLE_MANAGER, ROLE_STAFF];

/// Returns `true` if the given role string is valid.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
