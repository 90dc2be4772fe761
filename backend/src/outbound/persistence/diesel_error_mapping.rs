//! Shared classification of Diesel and pool failures.
//!
//! Repositories turn a [`DieselFailure`] into their own port error, using the
//! violated constraint name to tell duplicate usernames from duplicate emails
//! and missing subjects from missing uploaders.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to what the ports care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: Option<String> },
    /// The connection dropped mid-operation.
    Connection,
    /// Anything else; the message is safe to surface.
    Query(&'static str),
}

impl DieselFailure {
    /// Whether this is a violation of the named constraint.
    pub(crate) fn violates(&self, name: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint } | Self::ForeignKeyViolation { constraint } => {
                constraint.as_deref() == Some(name)
            }
            Self::Connection | Self::Query(_) => false,
        }
    }

    /// Message for the port's generic `Query`/`Connection` variants.
    pub(crate) fn message(&self) -> &'static str {
        match self {
            Self::UniqueViolation { .. } => "unique constraint violated",
            Self::ForeignKeyViolation { .. } => "foreign key constraint violated",
            Self::Connection => "database connection error",
            Self::Query(message) => message,
        }
    }

    pub(crate) fn is_connection(&self) -> bool {
        matches!(self, Self::Connection)
    }
}

/// Classify a Diesel error, logging the raw details at debug level.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Message carried by a pool failure.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
