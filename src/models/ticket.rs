//! JSON models for the `/tickets/` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ticket::{
        NewTicket as DomainNewTicket, StatusChange, Ticket as DomainTicket, TicketStatus,
        TicketUser, UpdateTicket as DomainUpdateTicket,
    },
    types::{
        AttachmentUrl, Email, TicketDescription, TicketId, TicketTitle, TypeConstraintError,
        UserId, Username,
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusHistory {
    #[serde(default)]
    pub id: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub changed_by: Option<User>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub created_by: Option<User>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status_history: Vec<StatusHistory>,
}

/// JSON body for create and update requests without an attachment.
#[derive(Debug, Serialize)]
pub struct TicketPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub status: &'a str,
}

/// Body of `PATCH /tickets/{id}/status/`.
#[derive(Debug, Serialize)]
pub struct StatusPatch<'a> {
    pub status: &'a str,
}

impl TryFrom<User> for TicketUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        // Accounts without an address come back as "".
        let email = user
            .email
            .filter(|email| !email.trim().is_empty())
            .and_then(|email| Email::new(email).ok());

        Ok(TicketUser {
            id: UserId::new(user.id)?,
            username: Username::new(user.username)?,
            email,
        })
    }
}

impl TryFrom<StatusHistory> for StatusChange {
    type Error = TypeConstraintError;

    fn try_from(entry: StatusHistory) -> Result<Self, Self::Error> {
        Ok(StatusChange {
            status: entry.status.parse()?,
            changed_at: entry.changed_at,
            changed_by: entry.changed_by.map(TicketUser::try_from).transpose()?,
        })
    }
}

impl TryFrom<Ticket> for DomainTicket {
    type Error = TypeConstraintError;

    fn try_from(ticket: Ticket) -> Result<Self, Self::Error> {
        let attachment = ticket
            .attachment
            .filter(|url| !url.trim().is_empty())
            .map(AttachmentUrl::new)
            .transpose()?;

        let status_history = ticket
            .status_history
            .into_iter()
            .map(StatusChange::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainTicket {
            id: TicketId::new(ticket.id)?,
            title: TicketTitle::new(ticket.title)?,
            description: TicketDescription::new(ticket.description)?,
            category: ticket.category.parse()?,
            status: ticket.status.parse()?,
            created_by: ticket.created_by.map(TicketUser::try_from).transpose()?,
            created_at: ticket.created_at,
            attachment,
            status_history,
        })
    }
}

impl<'a> From<&'a DomainNewTicket> for TicketPayload<'a> {
    fn from(ticket: &'a DomainNewTicket) -> Self {
        Self {
            title: ticket.title.as_str(),
            description: ticket.description.as_str(),
            category: ticket.category.as_str(),
            status: ticket.status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateTicket> for TicketPayload<'a> {
    fn from(ticket: &'a DomainUpdateTicket) -> Self {
        Self {
            title: ticket.title.as_str(),
            description: ticket.description.as_str(),
            category: ticket.category.as_str(),
            status: ticket.status.as_str(),
        }
    }
}

impl From<TicketStatus> for StatusPatch<'static> {
    fn from(status: TicketStatus) -> Self {
        Self {
            status: status.as_str(),
        }
    }
}
