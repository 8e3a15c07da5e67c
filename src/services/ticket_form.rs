//! Create and edit flows behind the ticket form.

use crate::domain::ticket::{NewTicket, Ticket, UpdateTicket};
use crate::dto::tickets::TicketFormPageData;
use crate::forms::tickets::{TicketFields, TicketFormValues, TicketSubmission};
use crate::repository::{TicketReader, TicketWriter};
use crate::services::tickets::{fetch_ticket, parse_ticket_id};
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedSession;

pub const ADMIN_EDIT_ONLY: &str = "Only admin users can edit tickets";
pub const SAVE_FAILED: &str = "Failed to save ticket";

/// Empty form for a new ticket. Status is never editable on creation.
pub fn new_ticket_form() -> TicketFormPageData {
    TicketFormPageData {
        ticket: None,
        values: TicketFormValues::default(),
        status_editable: false,
    }
}

/// Form pre-filled from the stored ticket. Admin-only.
pub async fn load_edit_form<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    id: i64,
) -> ServiceResult<TicketFormPageData>
where
    R: TicketReader + ?Sized,
{
    if !auth.is_admin() {
        return Err(ServiceError::Forbidden(ADMIN_EDIT_ONLY.to_string()));
    }

    let ticket = fetch_ticket(repo, auth, parse_ticket_id(id)?).await?;

    Ok(TicketFormPageData {
        values: TicketFormValues::from(&ticket),
        ticket: Some(ticket),
        status_editable: true,
    })
}

/// Creates a ticket. Any submitted status is ignored: new tickets start as `New`.
pub async fn create_ticket<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    submission: TicketSubmission,
) -> ServiceResult<Ticket>
where
    R: TicketWriter + ?Sized,
{
    let fields = TicketFields::try_from(&submission.values)?;
    let new_ticket = NewTicket::new(
        fields.title,
        fields.description,
        fields.category,
        submission.attachment,
    );

    repo.create_ticket(&auth.token, &new_ticket)
        .await
        .map_err(|err| {
            log::error!("Failed to create ticket: {err}");
            ServiceError::from(err)
        })
}

/// Updates a ticket. Admin-only; a missing status keeps the stored one.
pub async fn update_ticket<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    id: i64,
    submission: TicketSubmission,
) -> ServiceResult<Ticket>
where
    R: TicketReader + TicketWriter + ?Sized,
{
    if !auth.is_admin() {
        return Err(ServiceError::Forbidden(ADMIN_EDIT_ONLY.to_string()));
    }

    let id = parse_ticket_id(id)?;
    let fields = TicketFields::try_from(&submission.values)?;

    let status = match fields.status {
        Some(status) => status,
        None => fetch_ticket(repo, auth, id).await?.status,
    };

    let updates = UpdateTicket {
        title: fields.title,
        description: fields.description,
        category: fields.category,
        status,
        attachment: submission.attachment,
    };

    repo.update_ticket(&auth.token, id, &updates)
        .await
        .map_err(|err| {
            log::error!("Failed to update ticket {id}: {err}");
            ServiceError::from(err)
        })
}
