//! Domain aggregates exposed by the helpdesk service layer.

pub mod session;
pub mod ticket;
pub mod types;
