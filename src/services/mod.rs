//! Business flows invoked by the routes. Each function takes the repository
//! traits it needs so tests can substitute mocks.

pub mod auth;
pub mod errors;
pub mod ticket_form;
pub mod tickets;

pub use errors::{ServiceError, ServiceResult};
