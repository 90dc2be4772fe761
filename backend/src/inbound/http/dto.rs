//! Request and response bodies for the REST surface.
//!
//! Responses are built from domain aggregates and never carry password
//! digests. Requests stay raw strings so validation errors come from the
//! domain constructors with their field codes intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Material, MaterialDraft, MaterialSummary, MaterialType, Rating, RegistrationRequest, Role,
    Subject, SubjectId, User, UserProfileUpdate,
};

/// Body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl From<RegisterRequest> for RegistrationRequest {
    fn from(value: RegisterRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password,
            role: value.role,
        }
    }
}

/// Body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for `PUT /api/v1/users/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
}

impl From<UpdateUserRequest> for UserProfileUpdate {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
        }
    }
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            role: user.role(),
        }
    }
}

/// Answer of the existence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Current session identity reported by `GET /api/v1/auth/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

/// Body for creating or renaming a subject.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequest {
    #[schema(example = "Math")]
    pub name: String,
}

/// Public view of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub name: String,
}

impl From<&Subject> for SubjectResponse {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id().to_string(),
            name: subject.name().to_string(),
        }
    }
}

/// Body for creating or replacing a material.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    #[schema(example = "Intro to Graphs")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = "https://example.com/graphs")]
    pub url: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    #[schema(value_type = String, format = Uuid)]
    pub subject_id: SubjectId,
}

impl From<MaterialRequest> for MaterialDraft {
    fn from(value: MaterialRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            url: value.url,
            material_type: value.material_type,
            subject_id: value.subject_id,
        }
    }
}

/// Public view of a material.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    #[schema(value_type = String, format = Uuid)]
    pub subject_id: String,
    #[schema(value_type = String, format = Uuid)]
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Material> for MaterialResponse {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id().to_string(),
            title: material.title().as_ref().to_owned(),
            description: material.description().map(str::to_owned),
            url: material.url().as_ref().to_owned(),
            material_type: material.material_type(),
            subject_id: material.subject_id().to_string(),
            uploaded_by: material.uploader_id().to_string(),
            created_at: material.created_at(),
        }
    }
}

/// Material together with its rating aggregate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummaryResponse {
    pub material: MaterialResponse,
    pub rating_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

impl From<&MaterialSummary> for MaterialSummaryResponse {
    fn from(summary: &MaterialSummary) -> Self {
        Self {
            material: MaterialResponse::from(&summary.material),
            rating_count: summary.rating_count,
            average_score: summary.average_score,
        }
    }
}

/// Body for rating a material or changing a score.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub score: i64,
}

/// Body for `POST /api/v1/ratings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    #[schema(value_type = String, format = Uuid)]
    pub material_id: String,
    #[schema(minimum = 1, maximum = 5, example = 4)]
    pub score: i64,
}

/// Public view of a rating.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub score: u8,
    #[schema(value_type = String, format = Uuid)]
    pub material_id: String,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Rating> for RatingResponse {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id().to_string(),
            score: rating.score().get(),
            material_id: rating.material_id().to_string(),
            user_id: rating.user_id().to_string(),
            created_at: rating.created_at(),
        }
    }
}

/// Map a slice of aggregates into their response views.
pub(crate) fn collect<'a, T: 'a, R>(items: impl IntoIterator<Item = &'a T>) -> Vec<R>
where
    R: From<&'a T>,
{
    items.into_iter().map(R::from).collect()
}
