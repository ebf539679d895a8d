//! Pure domain logic for the bookline backend.
//!
//! This crate has zero internal dependencies and performs no I/O. It holds
//! the shared ID/timestamp types, the domain error taxonomy, validation
//! rules, pagination clamps, and the constants (roles, defaults, audit
//! actions) used by both the repository and service layers.

pub mod audit;
pub mod defaults;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validate;
