use async_trait::async_trait;
use reqwest::Method;

use crate::api_client::{decode_json_response, expect_success};
use crate::domain::session::{Credentials, NewAccount, SessionTokens, UserProfile};
use crate::domain::types::AccessToken;
use crate::models::auth::{LoginRequest, Me, RegisterRequest, TokenPair};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ApiRepository, AuthReader, AuthWriter};

#[async_trait]
impl AuthReader for ApiRepository {
    async fn current_user(&self, token: &AccessToken) -> RepositoryResult<UserProfile> {
        let response = self
            .client()
            .request(Method::GET, "/auth/me/", Some(token))
            .send()
            .await?;

        let me: Me = decode_json_response(response).await?;
        Ok(UserProfile::try_from(me)?)
    }
}

#[async_trait]
impl AuthWriter for ApiRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionTokens> {
        let response = self
            .client()
            .request(Method::POST, "/auth/login/", None)
            .json(&LoginRequest::from(credentials))
            .send()
            .await?;

        let pair: TokenPair = decode_json_response(response).await?;
        Ok(SessionTokens::try_from(pair)?)
    }

    async fn register(&self, account: &NewAccount) -> RepositoryResult<()> {
        let response = self
            .client()
            .request(Method::POST, "/auth/register/", None)
            .json(&RegisterRequest::from(account))
            .send()
            .await?;

        expect_success(response).await
    }
}
