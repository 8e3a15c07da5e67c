use async_trait::async_trait;

use crate::api_client::{ApiClient, ApiClientOptions};
use crate::domain::{
    session::{Credentials, NewAccount, SessionTokens, UserProfile},
    ticket::{NewTicket, Ticket, TicketStatus, UpdateTicket},
    types::{AccessToken, TicketId},
};
use crate::repository::errors::RepositoryResult;

pub mod auth;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod ticket;

/// Helpdesk REST API implementation of all repository traits.
#[derive(Clone)]
pub struct ApiRepository {
    client: ApiClient,
}

impl ApiRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_options(options: ApiClientOptions) -> RepositoryResult<Self> {
        Ok(Self::new(ApiClient::new(options)?))
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
pub trait AuthReader {
    /// Profile of the account the token belongs to.
    async fn current_user(&self, token: &AccessToken) -> RepositoryResult<UserProfile>;
}

#[async_trait]
pub trait AuthWriter {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionTokens>;
    async fn register(&self, account: &NewAccount) -> RepositoryResult<()>;
}

#[async_trait]
pub trait TicketReader {
    /// The whole collection visible to the token's owner. No server-side filtering.
    async fn list_tickets(&self, token: &AccessToken) -> RepositoryResult<Vec<Ticket>>;
    async fn get_ticket(&self, token: &AccessToken, id: TicketId)
    -> RepositoryResult<Option<Ticket>>;
}

#[async_trait]
pub trait TicketWriter {
    async fn create_ticket(&self, token: &AccessToken, ticket: &NewTicket)
    -> RepositoryResult<Ticket>;
    async fn update_ticket(
        &self,
        token: &AccessToken,
        id: TicketId,
        ticket: &UpdateTicket,
    ) -> RepositoryResult<Ticket>;
    /// Returns the ticket with its updated status history.
    async fn update_ticket_status(
        &self,
        token: &AccessToken,
        id: TicketId,
        status: TicketStatus,
    ) -> RepositoryResult<Ticket>;
    async fn delete_ticket(&self, token: &AccessToken, id: TicketId) -> RepositoryResult<()>;
}
