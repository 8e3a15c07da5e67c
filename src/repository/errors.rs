use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// Missing, expired or rejected bearer token.
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, but the API refused the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success API response onto an error, keeping the server message.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = error_message(body);

        match status {
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            StatusCode::UNAUTHORIZED => RepositoryError::Unauthorized(message),
            StatusCode::FORBIDDEN => RepositoryError::Forbidden(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::ValidationError(message)
            }
            _ => RepositoryError::Unexpected(format!("HTTP {status}: {message}")),
        }
    }

    /// The message a user should see, when the API provided one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            RepositoryError::Unauthorized(message)
            | RepositoryError::Forbidden(message)
            | RepositoryError::ValidationError(message)
                if !message.is_empty() =>
            {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Extracts a readable message from an API error body.
///
/// `{"detail": ".."}` and `{"message": ".."}` are used as-is; field error maps
/// such as `{"username": ["taken"]}` are flattened to `username: taken`.
pub fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).trim().to_string();
    };

    match value {
        Value::Object(map) => {
            for key in ["detail", "message"] {
                if let Some(Value::String(message)) = map.get(key) {
                    return message.clone();
                }
            }
            map.iter()
                .map(|(field, value)| format!("{field}: {}", flatten(value)))
                .collect::<Vec<_>>()
                .join(", ")
        }
        other => flatten(&other),
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::DecodeError(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            RepositoryError::ConnectionError(format!("Connection error: {err}"))
        } else {
            RepositoryError::Unexpected(format!("Unexpected HTTP error: {err}"))
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DecodeError(err.to_string())
    }
}
