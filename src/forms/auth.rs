//! Sign-in and sign-up forms.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::session::{Credentials, NewAccount};
use crate::domain::types::{Email, Username};
use crate::forms::FormError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate().map_err(|_| FormError::MissingFields)?;

        Ok(Credentials {
            username: Username::new(form.username).map_err(|_| FormError::MissingFields)?,
            password: form.password,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

impl RegisterForm {
    /// Copy safe to echo back into the form: passwords are dropped.
    pub fn without_passwords(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: self.email.clone(),
            ..Self::default()
        }
    }
}

// Checks run in this order and stop at the first failure.
impl TryFrom<RegisterForm> for NewAccount {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        let any_empty = [&form.username, &form.email, &form.password, &form.password2]
            .iter()
            .any(|value| value.trim().is_empty());
        if any_empty {
            return Err(FormError::MissingFields);
        }

        if form.password != form.password2 {
            return Err(FormError::PasswordMismatch);
        }

        if form.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }

        Ok(NewAccount {
            username: Username::new(form.username).map_err(|_| FormError::MissingFields)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
            password2: form.password2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str, password2: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            password2: password2.into(),
        }
    }

    #[test]
    fn registration_checks_run_in_order() {
        let err = NewAccount::try_from(form("", "a@b.io", "x", "y")).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");

        let err = NewAccount::try_from(form("ann", "a@b.io", "abc", "abd")).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        let err = NewAccount::try_from(form("ann", "a@b.io", "abc", "abc")).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = NewAccount::try_from(form("ann", "nope", "secret1", "secret1")).unwrap_err();
        assert!(matches!(err, FormError::InvalidEmail));
    }

    #[test]
    fn valid_registration_is_accepted() {
        let account = NewAccount::try_from(form(" ann ", "Ann@B.io", "secret1", "secret1"))
            .expect("valid account");
        assert_eq!(account.username.as_str(), "ann");
        assert_eq!(account.email.as_str(), "ann@b.io");
    }

    #[test]
    fn login_requires_both_fields() {
        let missing = LoginForm {
            username: "ann".into(),
            password: "".into(),
        };
        assert!(matches!(
            Credentials::try_from(missing),
            Err(FormError::MissingFields)
        ));

        let blank_name = LoginForm {
            username: "   ".into(),
            password: "pw".into(),
        };
        assert!(Credentials::try_from(blank_name).is_err());
    }

    #[test]
    fn echoed_form_drops_passwords() {
        let echoed = form("ann", "a@b.io", "secret1", "secret1").without_passwords();
        assert!(echoed.password.is_empty() && echoed.password2.is_empty());
        assert_eq!(echoed.username, "ann");
    }
}
