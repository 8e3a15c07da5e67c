use thiserror::Error;

use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Signed in, but the action is reserved to admins.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found")]
    NotFound,

    /// Input rejected locally or by the API, with a message for the user.
    #[error("{0}")]
    Form(String),

    /// The API rejected the stored access token.
    #[error("session expired")]
    SessionExpired,

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Message from the API when it sent one, `fallback` otherwise.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ServiceError::Forbidden(message) | ServiceError::Form(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            ServiceError::Repository(err) => err
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unauthorized(_) => ServiceError::SessionExpired,
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Forbidden(message) => ServiceError::Forbidden(message),
            RepositoryError::ValidationError(message) => ServiceError::Form(message),
            other => ServiceError::Repository(other),
        }
    }
}
