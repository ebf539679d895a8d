//! Service layer.
//!
//! Composes repository calls into entity workflows: validates input
//! before storage is touched, applies defaults, stamps the acting
//! principal, writes the audit trail in the same transaction as each
//! mutation, and translates storage errors into the domain taxonomy.
//! This crate is the outermost boundary of the core; the transport
//! adapter (GraphQL resolvers) lives outside it.

pub mod appointments;
pub mod assignments;
pub mod businesses;
pub mod catalog;
pub mod clients;
pub mod error;
pub mod staff;
pub mod users;

pub use appointments::AppointmentService;
pub use assignments::AssignmentService;
pub use businesses::BusinessService;
pub use catalog::CatalogService;
pub use clients::ClientService;
pub use staff::StaffService;
pub use users::UserService;
