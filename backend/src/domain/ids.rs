//! Stable surrogate identifiers for catalog entities.
//!
//! Entities reference each other only through these ids; joins are resolved by
//! the repositories on demand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a valid UUID")]
pub struct InvalidIdError {
    kind: &'static str,
}

impl InvalidIdError {
    /// Entity kind whose identifier failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its canonical string form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidIdError> {
                let raw = id.as_ref();
                if raw.trim() != raw {
                    return Err(InvalidIdError { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| InvalidIdError { kind: $kind })
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID, typically read back from storage.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a registered user.
    UserId,
    "user"
);
define_entity_id!(
    /// Identifier of a subject.
    SubjectId,
    "subject"
);
define_entity_id!(
    /// Identifier of a published material.
    MaterialId,
    "material"
);
define_entity_id!(
    /// Identifier of a single rating.
    RatingId,
    "rating"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        let err = UserId::new(raw).expect_err("malformed ids must fail");
        assert_eq!(err.kind(), "user");
        assert_eq!(err.to_string(), "user id must be a valid UUID");
    }

    #[rstest]
    fn parses_and_displays_canonical_form() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: MaterialId = raw.parse().expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let id = SubjectId::random();
        let value = serde_json::to_value(id).expect("id serialises");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }
}
