//! JSON models for the `/auth/` endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{
    session::{Credentials, NewAccount, SessionTokens, UserProfile},
    types::{AccessToken, Email, RefreshToken, TypeConstraintError, UserId, Username},
};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct Me {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password2: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: credentials.username.as_str(),
            password: &credentials.password,
        }
    }
}

impl<'a> From<&'a NewAccount> for RegisterRequest<'a> {
    fn from(account: &'a NewAccount) -> Self {
        Self {
            username: account.username.as_str(),
            email: account.email.as_str(),
            password: &account.password,
            password2: &account.password2,
        }
    }
}

impl TryFrom<TokenPair> for SessionTokens {
    type Error = TypeConstraintError;

    fn try_from(pair: TokenPair) -> Result<Self, Self::Error> {
        Ok(SessionTokens {
            access: AccessToken::new(pair.access)?,
            refresh: RefreshToken::new(pair.refresh)?,
        })
    }
}

impl TryFrom<Me> for UserProfile {
    type Error = TypeConstraintError;

    fn try_from(me: Me) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: me.id.map(UserId::new).transpose()?,
            username: Username::new(me.username)?,
            email: me
                .email
                .filter(|email| !email.trim().is_empty())
                .and_then(|email| Email::new(email).ok()),
            is_staff: me.is_staff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_reads_staff_flag() {
        let me: Me = serde_json::from_str(
            r#"{"id": 1, "username": "admin", "email": "Admin@Example.com", "is_staff": true}"#,
        )
        .unwrap();
        let profile = UserProfile::try_from(me).unwrap();
        assert!(profile.is_staff);
        assert_eq!(profile.email.unwrap().as_str(), "admin@example.com");

        let plain: Me = serde_json::from_str(r#"{"username": "bob"}"#).unwrap();
        assert!(!UserProfile::try_from(plain).unwrap().is_staff);
    }

    #[test]
    fn empty_tokens_are_rejected() {
        let pair = TokenPair {
            access: "".into(),
            refresh: "r".into(),
        };
        assert!(SessionTokens::try_from(pair).is_err());
    }
}
