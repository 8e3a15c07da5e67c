//! Browser session backed by the signed session cookie.
//!
//! Three keys are stored: `access_token`, `refresh_token` and `user` (the JSON
//! encoded [`Session`] record). Handlers reach them through [`SessionStore`]
//! and the [`AuthenticatedSession`] extractor.

use std::future::{Ready, ready};

use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest};
use thiserror::Error;

use crate::domain::session::{Session, SessionTokens};
use crate::domain::types::AccessToken;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session: {0}")]
    Read(String),
    #[error("failed to write session: {0}")]
    Write(String),
}

/// Key/value storage holding the session.
pub trait SessionStorage {
    fn get_value(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set_value(&self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove_value(&self, key: &str);
}

impl SessionStorage for actix_session::Session {
    fn get_value(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.get::<String>(key)
            .map_err(|e| SessionError::Read(e.to_string()))
    }

    fn set_value(&self, key: &str, value: String) -> Result<(), SessionError> {
        self.insert(key, value)
            .map_err(|e| SessionError::Write(e.to_string()))
    }

    fn remove_value(&self, key: &str) {
        self.remove(key);
    }
}

/// Typed access to the stored tokens and session record.
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Saves the token pair and the session record.
    pub fn persist(&self, tokens: &SessionTokens, session: &Session) -> Result<(), SessionError> {
        let user = serde_json::to_string(session).map_err(|e| SessionError::Write(e.to_string()))?;

        self.storage
            .set_value(ACCESS_TOKEN_KEY, tokens.access.to_string())?;
        self.storage
            .set_value(REFRESH_TOKEN_KEY, tokens.refresh.to_string())?;
        self.storage.set_value(USER_KEY, user)
    }

    /// The stored session record; unreadable records count as absent.
    pub fn current(&self) -> Option<Session> {
        match self.storage.get_value(USER_KEY) {
            Ok(Some(user)) => serde_json::from_str(&user)
                .inspect_err(|e| log::warn!("Discarding malformed session record: {e}"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.storage
            .get_value(ACCESS_TOKEN_KEY)
            .ok()
            .flatten()
            .and_then(|token| AccessToken::new(token).ok())
    }

    /// Presence of an access token. Expiry is not checked here.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current().is_some_and(|session| session.is_admin)
    }

    /// Removes every session key.
    pub fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            self.storage.remove_value(key);
        }
    }
}

/// A signed-in user: the session record together with its bearer token.
///
/// Extraction fails with `401 Unauthorized` when either is missing.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub token: AccessToken,
}

impl AuthenticatedSession {
    pub fn is_admin(&self) -> bool {
        self.session.is_admin
    }
}

impl FromRequest for AuthenticatedSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let store = SessionStore::new(req.get_session());

        ready(match (store.current(), store.access_token()) {
            (Some(session), Some(token)) => Ok(Self { session, token }),
            _ => Err(ErrorUnauthorized("not signed in")),
        })
    }
}

#[cfg(any(test, feature = "test-mocks"))]
pub mod memory {
    //! In-memory [`SessionStorage`] for tests.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{SessionError, SessionStorage};

    #[derive(Debug, Default)]
    pub struct MemorySessionStorage {
        values: RefCell<HashMap<String, String>>,
    }

    impl MemorySessionStorage {
        pub fn len(&self) -> usize {
            self.values.borrow().len()
        }

        pub fn is_empty(&self) -> bool {
            self.values.borrow().is_empty()
        }
    }

    impl SessionStorage for MemorySessionStorage {
        fn get_value(&self, key: &str) -> Result<Option<String>, SessionError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set_value(&self, key: &str, value: String) -> Result<(), SessionError> {
            self.values.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }

        fn remove_value(&self, key: &str) {
            self.values.borrow_mut().remove(key);
        }
    }

    impl SessionStorage for &MemorySessionStorage {
        fn get_value(&self, key: &str) -> Result<Option<String>, SessionError> {
            (*self).get_value(key)
        }

        fn set_value(&self, key: &str, value: String) -> Result<(), SessionError> {
            (*self).set_value(key, value)
        }

        fn remove_value(&self, key: &str) {
            (*self).remove_value(key)
        }
    }
}
