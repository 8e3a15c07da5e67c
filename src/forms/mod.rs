//! Form definitions backing the helpdesk routes.

use thiserror::Error;

pub mod auth;
pub mod tickets;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
///
/// The display strings are shown to the user as-is.
pub enum FormError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Title is required")]
    TitleRequired,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Category is required")]
    CategoryRequired,

    #[error("Unknown category")]
    InvalidCategory,

    #[error("Unknown status")]
    InvalidStatus,

    #[error("Only images, PDF and Word documents can be attached")]
    InvalidAttachment,

    #[error("Failed to read the uploaded file")]
    AttachmentRead,
}
