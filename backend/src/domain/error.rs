//! The catalog's single error type.
//!
//! Services return [`Error`] for every rejected operation; the HTTP adapter
//! turns the [`ErrorCode`] into a status and serialises the rest as the
//! response body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Failure category; serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Payload failed validation or could not be parsed.
    InvalidRequest,
    /// No authenticated caller, or credentials were rejected.
    Unauthorized,
    /// The caller is authenticated but does not own the resource.
    Forbidden,
    /// A referenced user, subject, material or rating does not exist.
    NotFound,
    /// A username, email or subject name is already taken.
    Conflict,
    /// The backing store could not be reached.
    ServiceUnavailable,
    /// Anything else that went wrong inside an adapter.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "login required",
            Self::Forbidden => "operation not permitted",
            Self::NotFound => "resource not found",
            Self::Conflict => "resource already exists",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Transport-agnostic failure returned by every catalog operation.
///
/// The message is never blank: [`Error::new`] substitutes the code's
/// [`fallback_message`](ErrorCode::fallback_message), and deserialising a
/// blank message fails.
///
/// # Examples
/// ```
/// use study_materials::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("material 42 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
///
/// let blank = Error::new(ErrorCode::Forbidden, "  ");
/// assert_eq!(blank.message(), "operation not permitted");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "subject 3fa85f64-5717-4562-b3fc-2c963f66afa6 not found")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Raised when a serialised error carries a blank message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

macro_rules! code_constructors {
    ($($ctor:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for `Error::new(ErrorCode::", stringify!($code), ", message)`.")]
            pub fn $ctor(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    /// Build an error; a blank message is replaced by the code's fallback.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Build an error, rejecting blank messages.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorValidationError::EmptyMessage`] when `message` is blank
    /// once trimmed.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    code_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured context, such as the offending field.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// Wire shape; deserialisation goes through [`Error::try_new`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let error = Self::try_new(value.code, value.message)?;
        Ok(match value.details {
            Some(details) => error.with_details(details),
            None => error,
        })
    }
}

/// Build an `invalid_request` error pointing at a single payload field.
///
/// Entity validation enums convert through this helper so every adapter sees
/// the same `{ "field", "code" }` details shape.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(serde_json::json!({
        "field": field,
        "code": code,
    }))
}
