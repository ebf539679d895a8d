//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept an executor as the first argument. Lifecycle operations
//! (lookup, paged listing, soft delete) delegate to the generic helpers
//! in [`crate::entity`]; entity-specific SQL lives here.

pub mod appointment_repo;
pub mod audit_log_repo;
pub mod business_repo;
pub mod client_repo;
pub mod service_assignment_repo;
pub mod service_repo;
pub mod staff_assignment_repo;
pub mod staff_repo;
pub mod user_repo;

pub use appointment_repo::AppointmentRepo;
pub use audit_log_repo::AuditLogRepo;
pub use business_repo::BusinessRepo;
pub use client_repo::ClientRepo;
pub use service_assignment_repo::ServiceAssignmentRepo;
pub use service_repo::ServiceRepo;
pub use staff_assignment_repo::StaffAssignmentRepo;
pub use staff_repo::StaffRepo;
pub use user_repo::UserRepo;
