//! Ticket create/edit form.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Ticket, TicketAttachment, TicketCategory, TicketStatus};
use crate::domain::types::{TicketDescription, TicketTitle};
use crate::forms::FormError;

/// Multipart body posted by the create and edit pages.
#[derive(MultipartForm)]
pub struct TicketForm {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub status: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub attachment: Option<TempFile>,
}

impl TicketForm {
    /// Splits the form into the text values and the uploaded file, if any.
    ///
    /// Browsers post an empty file part when nothing was chosen; that counts
    /// as no attachment.
    pub fn into_parts(self) -> (TicketFormValues, Option<TempFile>) {
        let text = |field: Option<Text<String>>| field.map(Text::into_inner).unwrap_or_default();

        let values = TicketFormValues {
            title: text(self.title),
            description: text(self.description),
            category: text(self.category),
            status: text(self.status),
        };
        let file = self.attachment.filter(|file| file.size > 0);

        (values, file)
    }
}

/// Reads an uploaded file into memory and checks its type.
///
/// The read runs on the blocking thread pool.
pub async fn read_attachment(
    file: Option<TempFile>,
) -> Result<Option<TicketAttachment>, FormError> {
    let Some(TempFile {
        file,
        content_type,
        file_name,
        ..
    }) = file
    else {
        return Ok(None);
    };

    let bytes = web::block(move || std::fs::read(file.path()))
        .await
        .map_err(|err| {
            log::error!("Upload read was cancelled: {err}");
            FormError::AttachmentRead
        })?
        .map_err(|err| {
            log::error!("Failed to read uploaded file: {err}");
            FormError::AttachmentRead
        })?;
    let file_name = file_name.unwrap_or_else(|| "attachment".to_string());
    let content_type = content_type
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    TicketAttachment::new(file_name, content_type, bytes)
        .map(Some)
        .map_err(|_| FormError::InvalidAttachment)
}

/// Raw field values, echoed back into the form when saving fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFormValues {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
}

impl Default for TicketFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: TicketCategory::default().to_string(),
            status: TicketStatus::default().to_string(),
        }
    }
}

impl From<&Ticket> for TicketFormValues {
    fn from(ticket: &Ticket) -> Self {
        Self {
            title: ticket.title.to_string(),
            description: ticket.description.to_string(),
            category: ticket.category.to_string(),
            status: ticket.status.to_string(),
        }
    }
}

/// Validated ticket fields.
#[derive(Debug, Clone)]
pub struct TicketFields {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub category: TicketCategory,
    /// `None` when the form did not carry a status.
    pub status: Option<TicketStatus>,
}

impl TryFrom<&TicketFormValues> for TicketFields {
    type Error = FormError;

    fn try_from(values: &TicketFormValues) -> Result<Self, Self::Error> {
        let title = TicketTitle::new(values.title.as_str()).map_err(|_| FormError::TitleRequired)?;
        let description = TicketDescription::new(values.description.as_str())
            .map_err(|_| FormError::DescriptionRequired)?;

        let category = values.category.trim();
        if category.is_empty() {
            return Err(FormError::CategoryRequired);
        }
        let category = category
            .parse::<TicketCategory>()
            .map_err(|_| FormError::InvalidCategory)?;

        let status = match values.status.trim() {
            "" => None,
            status => Some(
                status
                    .parse::<TicketStatus>()
                    .map_err(|_| FormError::InvalidStatus)?,
            ),
        };

        Ok(Self {
            title,
            description,
            category,
            status,
        })
    }
}

/// A submitted ticket form: its values plus the already read attachment.
#[derive(Debug, Clone, Default)]
pub struct TicketSubmission {
    pub values: TicketFormValues,
    pub attachment: Option<TicketAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(title: &str, description: &str, category: &str, status: &str) -> TicketFormValues {
        TicketFormValues {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            status: status.into(),
        }
    }

    #[test]
    fn required_fields_report_first_missing() {
        let err = TicketFields::try_from(&values(" ", "", "", "")).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");

        let err = TicketFields::try_from(&values("VPN", "  ", "Technical", "")).unwrap_err();
        assert_eq!(err.to_string(), "Description is required");

        let err = TicketFields::try_from(&values("VPN", "drops", "", "")).unwrap_err();
        assert_eq!(err.to_string(), "Category is required");

        let err = TicketFields::try_from(&values("VPN", "drops", "Hardware", "")).unwrap_err();
        assert!(matches!(err, FormError::InvalidCategory));
    }

    #[test]
    fn status_is_optional() {
        let fields = TicketFields::try_from(&values("VPN", "drops", "Technical", "")).unwrap();
        assert_eq!(fields.status, None);

        let fields =
            TicketFields::try_from(&values("VPN", "drops", "Product", "Under Review")).unwrap();
        assert_eq!(fields.category, TicketCategory::Product);
        assert_eq!(fields.status, Some(TicketStatus::UnderReview));

        assert!(TicketFields::try_from(&values("VPN", "drops", "Product", "Done")).is_err());
    }

    #[test]
    fn defaults_preselect_technical_and_new() {
        let defaults = TicketFormValues::default();
        assert_eq!(defaults.category, "Technical");
        assert_eq!(defaults.status, "New");
    }

    #[actix_web::test]
    async fn missing_upload_means_no_attachment() {
        assert_eq!(read_attachment(None).await.unwrap(), None);
    }

    fn upload(name: &str, contents: &[u8]) -> TempFile {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        TempFile {
            file,
            content_type: None,
            file_name: Some(name.to_string()),
            size: contents.len(),
        }
    }

    #[actix_web::test]
    async fn uploaded_document_is_read() {
        let attachment = read_attachment(Some(upload("report.pdf", b"%PDF")))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(attachment.file_name, "report.pdf");
        assert_eq!(attachment.content_type, "application/octet-stream");
        assert_eq!(attachment.bytes, b"%PDF");
    }

    #[actix_web::test]
    async fn unsupported_upload_is_rejected() {
        let err = read_attachment(Some(upload("script.sh", b"#!/bin/sh")))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidAttachment));
    }
}
