//! Status codes and response bodies for [`Error`].
//!
//! Adapter failures (`internal_error`, `service_unavailable`) are logged in
//! full and answered with the code's generic message only.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

// Conflicts travel as 400, alongside validation failures.
const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Conflict => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_body(err: &Error) -> Cow<'_, Error> {
    match err.code() {
        code @ (ErrorCode::InternalError | ErrorCode::ServiceUnavailable) => {
            error!(?code, message = %err.message(), details = ?err.details(), "request failed");
            Cow::Owned(Error::new(code, ""))
        }
        _ => Cow::Borrowed(err),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(public_body(self).as_ref())
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::new(ErrorCode::InternalError, "")
    }
}
