//! Who is calling: login input and the resolved [`Caller`].
//!
//! The session boundary turns an opaque cookie into a [`Caller`]; services
//! take it as an explicit argument and never consult ambient state.

use zeroize::Zeroizing;

use super::UserId;
use super::error::{Error, field_error};

/// Rejected login payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    const fn field(self) -> (&'static str, &'static str) {
        match self {
            Self::EmptyUsername => ("username", "empty_username"),
            Self::EmptyPassword => ("password", "empty_password"),
        }
    }
}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        let (field, code) = value.field();
        field_error(field, code, value.to_string())
    }
}

/// Username and password as submitted to `authenticate`.
///
/// The username is trimmed; the password is kept byte-for-byte and wiped
/// from memory on drop.
///
/// ```
/// use study_materials::domain::LoginCredentials;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter2 ")?;
/// assert_eq!(creds.username(), "ada");
/// assert_eq!(creds.password(), "hunter2 ");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login input.
    ///
    /// # Errors
    ///
    /// Returns [`LoginValidationError`] for a blank username or an empty
    /// password.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        match (username.is_empty(), password.is_empty()) {
            (true, _) => Err(LoginValidationError::EmptyUsername),
            (false, true) => Err(LoginValidationError::EmptyPassword),
            (false, false) => Ok(Self {
                username: username.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Identity attached to an inbound operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caller {
    /// No session could be resolved.
    #[default]
    Anonymous,
    /// A logged-in user.
    User(UserId),
}

impl Caller {
    /// Build a caller for an authenticated user.
    pub const fn authenticated(user_id: UserId) -> Self {
        Self::User(user_id)
    }

    /// Build a caller from an optional session identity.
    pub fn from_session(user_id: Option<UserId>) -> Self {
        user_id.map_or(Self::Anonymous, Self::User)
    }

    /// The caller's user id, when authenticated.
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    /// Require an authenticated caller or fail with `Unauthorized`.
    pub fn require(&self) -> Result<&UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require the caller to be `owner`.
    ///
    /// Anonymous callers get `Unauthorized`; any other user gets `Forbidden`
    /// with the supplied message.
    pub fn require_owner(&self, owner: &UserId, message: &str) -> Result<(), Error> {
        let caller = self.require()?;
        if caller == owner {
            Ok(())
        } else {
            Err(Error::forbidden(message))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada  ", "secret")]
    #[case("grace", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn anonymous_caller_is_unauthorized() {
        let err = Caller::Anonymous.require().expect_err("anonymous must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn from_session_maps_absent_identity_to_anonymous() {
        assert_eq!(Caller::from_session(None), Caller::Anonymous);
        let id = UserId::random();
        assert_eq!(Caller::from_session(Some(id)), Caller::User(id));
    }

    #[rstest]
    fn require_owner_distinguishes_anonymous_from_other_users() {
        let owner = UserId::random();

        assert!(Caller::authenticated(owner).require_owner(&owner, "nope").is_ok());

        let other = Caller::authenticated(UserId::random())
            .require_owner(&owner, "nope")
            .expect_err("other users are forbidden");
        assert_eq!(other.code(), ErrorCode::Forbidden);

        let anonymous = Caller::Anonymous
            .require_owner(&owner, "nope")
            .expect_err("anonymous callers are unauthorized");
        assert_eq!(anonymous.code(), ErrorCode::Unauthorized);
    }
}
