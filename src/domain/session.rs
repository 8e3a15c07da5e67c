//! Authenticated session records kept in the browser cookie.

use serde::{Deserialize, Serialize};

use crate::domain::types::{AccessToken, Email, RefreshToken, UserId, Username};

/// The identity shown to every view: who is signed in and whether admin-only
/// affordances are offered.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub username: Username,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl Session {
    #[must_use]
    pub fn new(username: Username, is_admin: bool) -> Self {
        Self { username, is_admin }
    }
}

impl From<&UserProfile> for Session {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            is_admin: profile.is_staff,
        }
    }
}

/// Token pair returned by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTokens {
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

/// Result of the "who am I" call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Option<UserId>,
    pub username: Username,
    pub email: Option<Email>,
    pub is_staff: bool,
}

/// Login request as typed by the user.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: Username,
    pub password: String,
}

/// Sign-up request after local validation.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub password: String,
    pub password2: String,
}
