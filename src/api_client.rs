//! HTTP client helpers.
//!
//! A thin wrapper around a shared [`reqwest::Client`] pointing at the helpdesk
//! REST API. Every request carries a fresh `x-request-id` and, when a token is
//! given, a bearer `Authorization` header.

use std::time::Duration;

use log::debug;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::types::AccessToken;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
/// Options used to build the shared API client.
pub struct ApiClientOptions {
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Connection-pooled client for the helpdesk API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(options: ApiClientOptions) -> RepositoryResult<Self> {
        let base_url = normalize_base_url(&options.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| RepositoryError::ConnectionError(format!("Failed to build client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            timeout: options.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`; a leading slash is optional.
    pub fn endpoint(&self, path: &str) -> String {
        let trimmed = path.trim();
        if trimmed.starts_with('/') {
            format!("{}{}", self.base_url, trimmed)
        } else {
            format!("{}/{}", self.base_url, trimmed)
        }
    }

    /// Starts a request with the request id and optional bearer token set.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
    ) -> RequestBuilder {
        let request_id = format!("req_{}", Uuid::new_v4().simple());
        debug!("{method} {path} ({request_id})");

        let builder = self
            .http
            .request(method, self.endpoint(path))
            .header("x-request-id", request_id)
            .timeout(self.timeout);

        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }
}

fn normalize_base_url(base_url: &str) -> RepositoryResult<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::ConnectionError(
            "API base url is missing".to_string(),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Reads the body, mapping non-success statuses onto [`RepositoryError`].
pub async fn decode_json_response<T>(response: Response) -> RepositoryResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(RepositoryError::from_response(status, &bytes));
    }

    serde_json::from_slice::<T>(&bytes).map_err(RepositoryError::from)
}

/// Like [`decode_json_response`] but `404` yields `Ok(None)`.
pub async fn decode_optional_json_response<T>(response: Response) -> RepositoryResult<Option<T>>
where
    T: DeserializeOwned,
{
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    decode_json_response(response).await.map(Some)
}

/// Checks the status and discards the body.
pub async fn expect_success(response: Response) -> RepositoryResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = response.bytes().await?;
    Err(RepositoryError::from_response(status, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_builder_normalizes_paths() {
        let client = ApiClient::new(ApiClientOptions::new("http://localhost:8000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.endpoint("/tickets/"),
            "http://localhost:8000/api/tickets/"
        );
        assert_eq!(
            client.endpoint("auth/me/"),
            "http://localhost:8000/api/auth/me/"
        );
    }

    #[test]
    fn base_url_missing_is_rejected() {
        assert!(matches!(
            ApiClient::new(ApiClientOptions::new("   ")),
            Err(RepositoryError::ConnectionError(_))
        ));
    }
}
