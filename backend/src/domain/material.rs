//! Material data model.
//!
//! A material is a link to external study content (a document, video or site)
//! published by a user under a subject. The catalog stores the URL verbatim and
//! never fetches it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{Error, field_error};
use super::{MaterialId, SubjectId, UserId};

/// Maximum allowed length for a material title.
pub const TITLE_MAX: usize = 200;

/// Validation errors raised by material constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterialValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("url must not be empty")]
    EmptyUrl,
    #[error("type must be one of GOOGLE_DRIVE, YOUTUBE, PDF_LINK, WEBSITE, OTHER")]
    UnknownType,
}

impl From<MaterialValidationError> for Error {
    fn from(value: MaterialValidationError) -> Self {
        let (field, code) = match value {
            MaterialValidationError::EmptyTitle => ("title", "empty_title"),
            MaterialValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
            MaterialValidationError::EmptyUrl => ("url", "empty_url"),
            MaterialValidationError::UnknownType => ("type", "unknown_type"),
        };
        field_error(field, code, value.to_string())
    }
}

/// Kind of external resource a material points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialType {
    GoogleDrive,
    Youtube,
    PdfLink,
    Website,
    Other,
}

impl MaterialType {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoogleDrive => "GOOGLE_DRIVE",
            Self::Youtube => "YOUTUBE",
            Self::PdfLink => "PDF_LINK",
            Self::Website => "WEBSITE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = MaterialValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GOOGLE_DRIVE" => Ok(Self::GoogleDrive),
            "YOUTUBE" => Ok(Self::Youtube),
            "PDF_LINK" => Ok(Self::PdfLink),
            "WEBSITE" => Ok(Self::Website),
            "OTHER" => Ok(Self::Other),
            _ => Err(MaterialValidationError::UnknownType),
        }
    }
}

/// Non-blank material title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate a title. The value is stored as given; only blankness and
    /// length are checked.
    pub fn new(title: impl Into<String>) -> Result<Self, MaterialValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(MaterialValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(MaterialValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = MaterialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-blank external URL, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MaterialUrl(String);

impl MaterialUrl {
    /// Validate a URL for presence only.
    pub fn new(url: impl Into<String>) -> Result<Self, MaterialValidationError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(MaterialValidationError::EmptyUrl);
        }
        Ok(Self(url))
    }
}

impl AsRef<str> for MaterialUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MaterialUrl> for String {
    fn from(value: MaterialUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for MaterialUrl {
    type Error = MaterialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Published link to external study content.
///
/// ## Invariants
/// - `subject_id` and `uploader_id` referenced existing records when the
///   material was created; deleting either removes the material.
/// - `created_at` is assigned once and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    id: MaterialId,
    title: Title,
    description: Option<String>,
    url: MaterialUrl,
    material_type: MaterialType,
    subject_id: SubjectId,
    uploader_id: UserId,
    created_at: DateTime<Utc>,
}

/// Validated editable fields of a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialContent {
    pub title: Title,
    pub description: Option<String>,
    pub url: MaterialUrl,
    pub material_type: MaterialType,
    pub subject_id: SubjectId,
}

impl Material {
    /// Assemble a material from validated content and its provenance.
    pub fn new(
        id: MaterialId,
        content: MaterialContent,
        uploader_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let MaterialContent {
            title,
            description,
            url,
            material_type,
            subject_id,
        } = content;
        Self {
            id,
            title,
            description,
            url,
            material_type,
            subject_id,
            uploader_id,
            created_at,
        }
    }

    pub fn id(&self) -> &MaterialId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> &MaterialUrl {
        &self.url
    }

    pub fn material_type(&self) -> MaterialType {
        self.material_type
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    pub fn uploader_id(&self) -> &UserId {
        &self.uploader_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the editable content, keeping id, uploader and timestamp.
    #[must_use]
    pub fn with_content(self, content: MaterialContent) -> Self {
        Self::new(self.id, content, self.uploader_id, self.created_at)
    }
}

/// Raw material input prior to validation, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDraft {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub material_type: MaterialType,
    pub subject_id: SubjectId,
}

impl MaterialDraft {
    /// Validate the draft into [`MaterialContent`].
    pub fn validate(self) -> Result<MaterialContent, MaterialValidationError> {
        Ok(MaterialContent {
            title: Title::new(self.title)?,
            description: self.description,
            url: MaterialUrl::new(self.url)?,
            material_type: self.material_type,
            subject_id: self.subject_id,
        })
    }
}

/// Material together with aggregate rating figures.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSummary {
    pub material: Material,
    pub rating_count: usize,
    /// Arithmetic mean of all scores; `None` when unrated.
    pub average_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn draft() -> MaterialDraft {
        MaterialDraft {
            title: "Intro to Graphs".into(),
            description: Some("  BFS and DFS  ".into()),
            url: "https://example.com/graphs.pdf".into(),
            material_type: MaterialType::PdfLink,
            subject_id: SubjectId::random(),
        }
    }

    #[rstest]
    fn validate_keeps_values_verbatim(draft: MaterialDraft) {
        let content = draft.clone().validate().expect("valid draft");
        assert_eq!(content.title.as_ref(), draft.title);
        assert_eq!(content.description, draft.description);
        assert_eq!(content.url.as_ref(), draft.url);
    }

    #[rstest]
    #[case::blank_title(MaterialDraft { title: "  ".into(), ..draft() }, MaterialValidationError::EmptyTitle)]
    #[case::long_title(
        MaterialDraft { title: "t".repeat(TITLE_MAX + 1), ..draft() },
        MaterialValidationError::TitleTooLong { max: TITLE_MAX }
    )]
    #[case::blank_url(MaterialDraft { url: String::new(), ..draft() }, MaterialValidationError::EmptyUrl)]
    fn validate_rejects_bad_fields(
        #[case] draft: MaterialDraft,
        #[case] expected: MaterialValidationError,
    ) {
        assert_eq!(draft.validate(), Err(expected));
    }

    #[rstest]
    #[case("GOOGLE_DRIVE", MaterialType::GoogleDrive)]
    #[case("YOUTUBE", MaterialType::Youtube)]
    #[case("PDF_LINK", MaterialType::PdfLink)]
    #[case("WEBSITE", MaterialType::Website)]
    #[case("OTHER", MaterialType::Other)]
    fn material_type_storage_form(#[case] raw: &str, #[case] expected: MaterialType) {
        assert_eq!(raw.parse::<MaterialType>(), Ok(expected));
        assert_eq!(
            serde_json::to_value(expected).expect("type serialises"),
            json!(raw)
        );
    }

    #[rstest]
    fn unknown_type_maps_to_invalid_request() {
        let err = Error::from("VIDEO".parse::<MaterialType>().expect_err("unknown type"));
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details(), Some(&json!({"field": "type", "code": "unknown_type"})));
    }

    #[rstest]
    fn with_content_preserves_provenance(draft: MaterialDraft) {
        let uploader = UserId::random();
        let created_at = Utc::now();
        let material = Material::new(
            MaterialId::random(),
            draft.clone().validate().expect("valid draft"),
            uploader,
            created_at,
        );
        let id = *material.id();

        let updated = material.with_content(
            MaterialDraft {
                title: "Graphs II".into(),
                description: None,
                ..draft
            }
            .validate()
            .expect("valid draft"),
        );

        assert_eq!(updated.id(), &id);
        assert_eq!(updated.uploader_id(), &uploader);
        assert_eq!(updated.created_at(), created_at);
        assert_eq!(updated.title().as_ref(), "Graphs II");
        assert_eq!(updated.description(), None);
    }
}
