//! Sign-in, sign-up and sign-out.

use crate::domain::session::{Credentials, NewAccount, Session};
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::{AuthReader, AuthWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::session::{SessionStorage, SessionStore};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Exchanges credentials for tokens, fetches the profile and stores both.
///
/// Nothing is stored unless both calls succeed.
pub async fn login<R, S>(
    repo: &R,
    store: &SessionStore<S>,
    form: LoginForm,
) -> ServiceResult<Session>
where
    R: AuthReader + AuthWriter + ?Sized,
    S: SessionStorage,
{
    let credentials = Credentials::try_from(form)?;

    let tokens = repo.login(&credentials).await.map_err(|err| {
        log::warn!("Login failed for {}: {err}", credentials.username);
        ServiceError::Form(err.user_message().unwrap_or(LOGIN_FAILED).to_string())
    })?;

    let profile = repo.current_user(&tokens.access).await.map_err(|err| {
        log::error!("Failed to fetch profile after login: {err}");
        ServiceError::Form(err.user_message().unwrap_or(LOGIN_FAILED).to_string())
    })?;

    let session = Session::from(&profile);
    store.persist(&tokens, &session).map_err(|err| {
        log::error!("Failed to store session: {err}");
        ServiceError::Form(LOGIN_FAILED.to_string())
    })?;

    Ok(session)
}

/// Validates the sign-up form locally, then creates the account.
///
/// The new user is not signed in.
pub async fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<()>
where
    R: AuthWriter + ?Sized,
{
    let account = NewAccount::try_from(form)?;

    repo.register(&account).await.map_err(|err| {
        log::warn!("Registration failed for {}: {err}", account.username);
        ServiceError::Form(
            err.user_message()
                .unwrap_or(REGISTRATION_FAILED)
                .to_string(),
        )
    })
}

/// Forgets the stored tokens and session record.
pub fn logout<S: SessionStorage>(store: &SessionStore<S>) {
    store.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{SessionTokens, UserProfile};
    use crate::domain::types::{AccessToken, RefreshToken, UserId, Username};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::session::memory::MemorySessionStorage;

    fn login_form() -> LoginForm {
        LoginForm {
            username: "admin".into(),
            password: "secret1".into(),
        }
    }

    fn tokens() -> SessionTokens {
        SessionTokens {
            access: AccessToken::new("acc").unwrap(),
            refresh: RefreshToken::new("ref").unwrap(),
        }
    }

    #[actix_web::test]
    async fn login_persists_tokens_and_admin_flag() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .withf(|c| c.username.as_str() == "admin" && c.password == "secret1")
            .times(1)
            .returning(|_| Ok(tokens()));
        repo.expect_current_user()
            .withf(|token| token.as_str() == "acc")
            .times(1)
            .returning(|_| {
                Ok(UserProfile {
                    id: UserId::new(1).ok(),
                    username: Username::new("admin").unwrap(),
                    email: None,
                    is_staff: true,
                })
            });

        let storage = MemorySessionStorage::default();
        let store = SessionStore::new(&storage);

        let session = login(&repo, &store, login_form()).await.unwrap();

        assert!(session.is_admin);
        assert!(store.is_authenticated());
        assert_eq!(store.current(), Some(session));
    }

    #[actix_web::test]
    async fn login_failure_shows_server_detail() {
        let mut repo = MockRepository::new();
        repo.expect_login().times(1).returning(|_| {
            Err(RepositoryError::Unauthorized(
                "No active account found with the given credentials".into(),
            ))
        });
        repo.expect_current_user().times(0);

        let storage = MemorySessionStorage::default();
        let store = SessionStore::new(&storage);

        let err = login(&repo, &store, login_form()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "No active account found with the given credentials"
        );
        assert!(storage.is_empty());
    }

    #[actix_web::test]
    async fn login_failure_without_detail_uses_fallback() {
        let mut repo = MockRepository::new();
        repo.expect_login()
            .returning(|_| Err(RepositoryError::ConnectionError("refused".into())));

        let storage = MemorySessionStorage::default();
        let err = login(&repo, &SessionStore::new(&storage), login_form())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), LOGIN_FAILED);
    }

    #[actix_web::test]
    async fn profile_failure_leaves_session_unset() {
        let mut repo = MockRepository::new();
        repo.expect_login().returning(|_| Ok(tokens()));
        repo.expect_current_user()
            .returning(|_| Err(RepositoryError::Unexpected("HTTP 500".into())));

        let storage = MemorySessionStorage::default();
        let store = SessionStore::new(&storage);

        assert!(login(&repo, &store, login_form()).await.is_err());
        assert!(!store.is_authenticated());
    }

    #[actix_web::test]
    async fn invalid_registration_never_reaches_api() {
        let mut repo = MockRepository::new();
        repo.expect_register().times(0);

        let form = RegisterForm {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "secret1".into(),
            password2: "secret2".into(),
        };

        let err = register(&repo, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[actix_web::test]
    async fn registration_field_errors_are_flattened() {
        let mut repo = MockRepository::new();
        repo.expect_register().times(1).returning(|_| {
            Err(RepositoryError::from_response(
                reqwest::StatusCode::BAD_REQUEST,
                br#"{"username": ["A user with that username already exists."]}"#,
            ))
        });

        let form = RegisterForm {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "secret1".into(),
            password2: "secret1".into(),
        };

        let err = register(&repo, form).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "username: A user with that username already exists."
        );
    }

    #[test]
    fn logout_clears_session() {
        let storage = MemorySessionStorage::default();
        let store = SessionStore::new(&storage);
        store
            .persist(&tokens(), &Session::new(Username::new("ann").unwrap(), false))
            .unwrap();

        logout(&store);

        assert!(storage.is_empty());
    }
}
