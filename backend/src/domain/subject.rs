//! Subject data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SubjectId;
use super::error::{Error, field_error};

/// Maximum allowed length for a subject name.
pub const SUBJECT_NAME_MAX: usize = 100;

/// Validation errors raised by [`SubjectName::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectValidationError {
    #[error("subject name must not be empty")]
    EmptyName,
    #[error("subject name must be at most {max} characters")]
    NameTooLong { max: usize },
}

impl From<SubjectValidationError> for Error {
    fn from(value: SubjectValidationError) -> Self {
        let code = match value {
            SubjectValidationError::EmptyName => "empty_name",
            SubjectValidationError::NameTooLong { .. } => "name_too_long",
        };
        field_error("name", code, value.to_string())
    }
}

/// Unique subject name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectName(String);

impl SubjectName {
    /// Validate and construct a [`SubjectName`]. Surrounding whitespace is dropped.
    pub fn new(name: impl AsRef<str>) -> Result<Self, SubjectValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SubjectValidationError::EmptyName);
        }
        if trimmed.chars().count() > SUBJECT_NAME_MAX {
            return Err(SubjectValidationError::NameTooLong {
                max: SUBJECT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SubjectName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SubjectName> for String {
    fn from(value: SubjectName) -> Self {
        value.0
    }
}

impl TryFrom<String> for SubjectName {
    type Error = SubjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Named topic that materials are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: SubjectId,
    name: SubjectName,
}

impl Subject {
    /// Build a subject from validated parts.
    pub fn new(id: SubjectId, name: SubjectName) -> Self {
        Self { id, name }
    }

    /// Stable identifier.
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    /// Unique name.
    pub fn name(&self) -> &SubjectName {
        &self.name
    }

    /// Return a copy carrying a new name.
    #[must_use]
    pub fn renamed(self, name: SubjectName) -> Self {
        Self { name, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", SubjectValidationError::EmptyName)]
    #[case(" \t ", SubjectValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: SubjectValidationError) {
        assert_eq!(SubjectName::new(raw), Err(expected));
    }

    #[rstest]
    fn enforces_length_limit() {
        assert!(SubjectName::new("m".repeat(SUBJECT_NAME_MAX)).is_ok());
        assert_eq!(
            SubjectName::new("m".repeat(SUBJECT_NAME_MAX + 1)),
            Err(SubjectValidationError::NameTooLong {
                max: SUBJECT_NAME_MAX
            })
        );
    }

    #[rstest]
    fn renamed_keeps_identifier() {
        let subject = Subject::new(
            SubjectId::random(),
            SubjectName::new("Math").expect("valid name"),
        );
        let id = *subject.id();
        let renamed = subject.renamed(SubjectName::new("Algebra").expect("valid name"));
        assert_eq!(renamed.id(), &id);
        assert_eq!(renamed.name().as_ref(), "Algebra");
    }
}
