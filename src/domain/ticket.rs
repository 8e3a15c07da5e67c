//! Helpdesk tickets and their status lifecycle.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AttachmentUrl, Email, TicketDescription, TicketId, TicketTitle, TypeConstraintError, UserId,
    Username,
};

/// Fixed set of ticket categories accepted by the API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TicketCategory {
    #[default]
    Technical,
    Financial,
    Product,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 3] = [
        TicketCategory::Technical,
        TicketCategory::Financial,
        TicketCategory::Product,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TicketCategory::Technical => "Technical",
            TicketCategory::Financial => "Financial",
            TicketCategory::Product => "Product",
        }
    }
}

impl Display for TicketCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketCategory {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown category {s}")))
    }
}

/// Ticket workflow status.
///
/// The three states are mutually reachable: an admin may move a ticket from
/// any status to any other, including back from `Resolved` to `New`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TicketStatus {
    #[default]
    New,
    #[serde(rename = "Under Review")]
    UnderReview,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::New,
        TicketStatus::UnderReview,
        TicketStatus::Resolved,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::UnderReview => "Under Review",
            TicketStatus::Resolved => "Resolved",
        }
    }

    /// Returns `true` when moving from `self` to `target` changes anything.
    ///
    /// Only the no-op transition is rejected; there is no enforced ordering.
    pub fn can_transition_to(self, target: TicketStatus) -> bool {
        self != target
    }

    /// Statuses reachable from `self`, in display order.
    pub fn transitions(self) -> Vec<TicketStatus> {
        TicketStatus::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown status {s}")))
    }
}

/// Account reference embedded in tickets and history entries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketUser {
    pub id: UserId,
    pub username: Username,
    pub email: Option<Email>,
}

/// One recorded status change. Entries are produced by the API only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub status: TicketStatus,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<TicketUser>,
}

/// How an attachment should be presented, derived from its URL extension.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
    File,
}

impl AttachmentKind {
    const IMAGE_EXTENSIONS: [&'static str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

    pub fn of(url: &AttachmentUrl) -> Self {
        let extension = url.extension();
        if Self::IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            AttachmentKind::Image
        } else if extension == "pdf" {
            AttachmentKind::Pdf
        } else {
            AttachmentKind::File
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub created_by: Option<TicketUser>,
    pub created_at: DateTime<Utc>,
    pub attachment: Option<AttachmentUrl>,
    /// Ordered oldest first; append-only on the server side.
    pub status_history: Vec<StatusChange>,
}

impl Ticket {
    /// Username of the creator, if the API returned one.
    pub fn creator_name(&self) -> Option<&str> {
        self.created_by.as_ref().map(|user| user.username.as_str())
    }

    /// Case-insensitive substring match against title, description or creator.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .creator_name()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }

    /// The history as it should be displayed.
    ///
    /// An empty history (tickets created before history tracking) is shown as
    /// a single entry for the current status at creation time.
    pub fn display_history(&self) -> Vec<StatusChange> {
        if self.status_history.is_empty() {
            vec![StatusChange {
                status: self.status,
                changed_at: self.created_at,
                changed_by: self.created_by.clone(),
            }]
        } else {
            self.status_history.clone()
        }
    }

    /// `true` when the last history entry agrees with the current status.
    pub fn history_is_consistent(&self) -> bool {
        self.status_history
            .last()
            .is_none_or(|last| last.status == self.status)
    }

    pub fn attachment_kind(&self) -> Option<AttachmentKind> {
        self.attachment.as_ref().map(AttachmentKind::of)
    }
}

/// File uploaded alongside a ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl TicketAttachment {
    const DOCUMENT_EXTENSIONS: [&'static str; 3] = ["pdf", "doc", "docx"];

    /// Accepts images of any type plus PDF and Word documents.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, TypeConstraintError> {
        let file_name = file_name.into().trim().to_string();
        let content_type = content_type.into().trim().to_lowercase();

        if file_name.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        let accepted = content_type.starts_with("image/")
            || Self::DOCUMENT_EXTENSIONS.contains(&extension.as_str());

        if !accepted {
            return Err(TypeConstraintError::InvalidValue(format!(
                "unsupported attachment type: {file_name}"
            )));
        }

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// Payload for `POST /tickets/`.
#[derive(Clone, Debug)]
pub struct NewTicket {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub attachment: Option<TicketAttachment>,
}

impl NewTicket {
    #[must_use]
    pub fn new(
        title: TicketTitle,
        description: TicketDescription,
        category: TicketCategory,
        attachment: Option<TicketAttachment>,
    ) -> Self {
        Self {
            title,
            description,
            category,
            status: TicketStatus::New,
            attachment,
        }
    }
}

/// Payload for `PUT /tickets/{id}/`.
#[derive(Clone, Debug)]
pub struct UpdateTicket {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub category: TicketCategory,
    pub status: TicketStatus,
    /// `None` keeps the existing attachment.
    pub attachment: Option<TicketAttachment>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn user(id: i64, name: &str) -> TicketUser {
        TicketUser {
            id: UserId::new(id).expect("valid id"),
            username: Username::new(name).expect("valid username"),
            email: None,
        }
    }

    fn ticket(status: TicketStatus, history: Vec<TicketStatus>) -> Ticket {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Ticket {
            id: TicketId::new(1).unwrap(),
            title: TicketTitle::new("VPN drops").unwrap(),
            description: TicketDescription::new("Connection BUG after sleep").unwrap(),
            category: TicketCategory::Technical,
            status,
            created_by: Some(user(3, "Marta")),
            created_at,
            attachment: None,
            status_history: history
                .into_iter()
                .map(|status| StatusChange {
                    status,
                    changed_at: created_at,
                    changed_by: Some(user(1, "admin")),
                })
                .collect(),
        }
    }

    #[test]
    fn every_status_reaches_every_other() {
        for from in TicketStatus::ALL {
            for to in TicketStatus::ALL {
                assert_eq!(from.can_transition_to(to), from != to);
            }
            assert_eq!(from.transitions().len(), 2);
        }
        assert!(TicketStatus::Resolved.can_transition_to(TicketStatus::New));
    }

    #[test]
    fn status_wire_names_round_trip() {
        assert_eq!(
            "Under Review".parse::<TicketStatus>(),
            Ok(TicketStatus::UnderReview)
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::UnderReview).unwrap(),
            "\"Under Review\""
        );
        assert!("Closed".parse::<TicketStatus>().is_err());
        assert!("Hardware".parse::<TicketCategory>().is_err());
    }

    #[test]
    fn search_matches_title_description_and_creator_case_insensitively() {
        let t = ticket(TicketStatus::New, vec![]);
        assert!(t.matches_search("vpn"));
        assert!(t.matches_search("bug"));
        assert!(t.matches_search("marta"));
        assert!(!t.matches_search("printer"));
    }

    #[test]
    fn empty_history_is_displayed_as_creation_entry() {
        let t = ticket(TicketStatus::New, vec![]);
        let history = t.display_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TicketStatus::New);
        assert_eq!(history[0].changed_at, t.created_at);
        assert_eq!(
            history[0].changed_by.as_ref().map(|u| u.username.as_str()),
            Some("Marta")
        );
    }

    #[test]
    fn history_consistency_checks_last_entry() {
        let consistent = ticket(
            TicketStatus::Resolved,
            vec![TicketStatus::New, TicketStatus::Resolved],
        );
        assert!(consistent.history_is_consistent());

        let stale = ticket(TicketStatus::New, vec![TicketStatus::UnderReview]);
        assert!(!stale.history_is_consistent());
    }

    #[test]
    fn attachment_kind_follows_extension() {
        let kind = |url: &str| AttachmentKind::of(&AttachmentUrl::new(url).unwrap());
        assert_eq!(kind("https://cdn.example.com/a/photo.JPG"), AttachmentKind::Image);
        assert_eq!(kind("https://cdn.example.com/raw/upload/manual.pdf"), AttachmentKind::Pdf);
        assert_eq!(kind("https://cdn.example.com/a/notes.docx"), AttachmentKind::File);
    }

    #[test]
    fn attachment_accepts_images_and_documents_only() {
        assert!(TicketAttachment::new("screen.png", "image/png", vec![1]).is_ok());
        assert!(TicketAttachment::new("invoice.PDF", "application/pdf", vec![1]).is_ok());
        assert!(TicketAttachment::new("notes.docx", "application/octet-stream", vec![1]).is_ok());
        assert!(TicketAttachment::new("run.exe", "application/x-msdownload", vec![1]).is_err());
        assert!(TicketAttachment::new("  ", "image/png", vec![1]).is_err());
    }

    #[test]
    fn new_ticket_starts_as_new() {
        let new = NewTicket::new(
            TicketTitle::new("Refund").unwrap(),
            TicketDescription::new("Charged twice").unwrap(),
            TicketCategory::Financial,
            None,
        );
        assert_eq!(new.status, TicketStatus::New);
    }
}
