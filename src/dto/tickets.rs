//! DTOs shaped for the ticket detail and form templates.

use serde::Serialize;

use crate::domain::ticket::{AttachmentKind, StatusChange, Ticket, TicketStatus};
use crate::forms::tickets::TicketFormValues;

/// Attachment as presented on the detail page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttachmentView {
    pub url: String,
    pub file_name: String,
    pub kind: AttachmentKind,
}

/// Aggregated data required to render the ticket details page.
#[derive(Debug)]
pub struct TicketPageData {
    pub ticket: Ticket,
    /// History to display; never empty.
    pub history: Vec<StatusChange>,
    pub attachment: Option<AttachmentView>,
    /// Statuses an admin may move the ticket to.
    pub transitions: Vec<TicketStatus>,
}

impl From<Ticket> for TicketPageData {
    fn from(ticket: Ticket) -> Self {
        let attachment = ticket.attachment.as_ref().map(|url| AttachmentView {
            url: url.to_string(),
            file_name: url.file_name().to_string(),
            kind: AttachmentKind::of(url),
        });

        Self {
            history: ticket.display_history(),
            transitions: ticket.status.transitions(),
            attachment,
            ticket,
        }
    }
}

/// Data for the create/edit form.
#[derive(Debug, Default)]
pub struct TicketFormPageData {
    /// `Some` when editing.
    pub ticket: Option<Ticket>,
    pub values: TicketFormValues,
    /// Whether the status select is shown.
    pub status_editable: bool,
}
