//! Port for material persistence and filtered listings.
use async_trait::async_trait;

use crate::domain::{Material, MaterialId, MaterialType, SubjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by material repository adapters.
    pub enum MaterialRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "material repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "material repository query failed: {message}",
        /// The referenced subject does not exist.
        SubjectNotFound { subject_id: SubjectId } => "subject {subject_id} not found",
        /// The referenced uploader does not exist.
        UploaderNotFound { user_id: UserId } => "user {user_id} not found",
    }
}

/// Selection applied to material listings.
///
/// Substring filters compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialFilter {
    /// Every material.
    All,
    /// Materials of one type.
    ByType(MaterialType),
    /// Materials filed under one subject.
    BySubject(SubjectId),
    /// Materials published by one user.
    ByUploader(UserId),
    /// Materials whose title contains the text.
    TitleContains(String),
    /// Materials whose uploader's username contains the text.
    UploaderUsernameContains(String),
}

/// Port for storing and querying materials.
///
/// Listings are ordered by `(created_at, id)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a material. Fails when its subject or uploader is unknown.
    async fn insert(&self, material: &Material) -> Result<(), MaterialRepositoryError>;

    /// Fetch a material by identifier.
    async fn find_by_id(&self, id: &MaterialId)
    -> Result<Option<Material>, MaterialRepositoryError>;

    /// List materials matching `filter`.
    async fn list(&self, filter: &MaterialFilter) -> Result<Vec<Material>, MaterialRepositoryError>;

    /// Overwrite the editable fields of an existing material.
    ///
    /// Returns `false` when the material no longer exists.
    async fn update(&self, material: &Material) -> Result<bool, MaterialRepositoryError>;

    /// Delete a material and its ratings atomically, returning how many
    /// ratings went with it. `None` when the material does not exist.
    async fn delete(&self, id: &MaterialId) -> Result<Option<usize>, MaterialRepositoryError>;
}
