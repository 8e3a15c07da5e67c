//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::session::{Credentials, NewAccount, SessionTokens, UserProfile};
use crate::domain::ticket::{NewTicket, Ticket, TicketStatus, UpdateTicket};
use crate::domain::types::{AccessToken, TicketId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{AuthReader, AuthWriter, TicketReader, TicketWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl AuthReader for Repository {
        async fn current_user(&self, token: &AccessToken) -> RepositoryResult<UserProfile>;
    }

    #[async_trait]
    impl AuthWriter for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionTokens>;
        async fn register(&self, account: &NewAccount) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl TicketReader for Repository {
        async fn list_tickets(&self, token: &AccessToken) -> RepositoryResult<Vec<Ticket>>;
        async fn get_ticket(
            &self,
            token: &AccessToken,
            id: TicketId,
        ) -> RepositoryResult<Option<Ticket>>;
    }

    #[async_trait]
    impl TicketWriter for Repository {
        async fn create_ticket(
            &self,
            token: &AccessToken,
            ticket: &NewTicket,
        ) -> RepositoryResult<Ticket>;
        async fn update_ticket(
            &self,
            token: &AccessToken,
            id: TicketId,
            ticket: &UpdateTicket,
        ) -> RepositoryResult<Ticket>;
        async fn update_ticket_status(
            &self,
            token: &AccessToken,
            id: TicketId,
            status: TicketStatus,
        ) -> RepositoryResult<Ticket>;
        async fn delete_ticket(&self, token: &AccessToken, id: TicketId) -> RepositoryResult<()>;
    }
}
