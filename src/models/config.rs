//! Configuration model loaded from external sources.

use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

fn default_api_timeout_secs() -> u64 {
    15
}

fn default_tickets_per_page() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_ITEMS_PER_PAGE).unwrap_or(NonZeroUsize::MIN)
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Root of the helpdesk REST API, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    /// Page size of the ticket list; zero is rejected when loading.
    #[serde(default = "default_tickets_per_page")]
    pub tickets_per_page: NonZeroUsize,
}
