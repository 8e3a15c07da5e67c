//! Wire models exchanged with the helpdesk REST API, plus server configuration.

pub mod auth;
pub mod config;
pub mod ticket;
