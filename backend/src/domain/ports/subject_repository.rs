//! Port for subject persistence.
use async_trait::async_trait;

use crate::domain::{CascadeReport, Subject, SubjectId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subject repository adapters.
    pub enum SubjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subject repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subject repository query failed: {message}",
        /// Another subject already uses the name.
        DuplicateName { name: String } => "subject {name} already exists",
    }
}

/// Port for storing, searching and removing subjects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Insert a new subject, rejecting duplicate names.
    async fn insert(&self, subject: &Subject) -> Result<(), SubjectRepositoryError>;

    /// Fetch a subject by identifier.
    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, SubjectRepositoryError>;

    /// Fetch a subject by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, SubjectRepositoryError>;

    /// List every subject ordered by name.
    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError>;

    /// Subjects whose name contains `keyword`, ignoring case, ordered by name.
    async fn search(&self, keyword: &str) -> Result<Vec<Subject>, SubjectRepositoryError>;

    /// Rename an existing subject. Returns `false` when it no longer exists.
    async fn update(&self, subject: &Subject) -> Result<bool, SubjectRepositoryError>;

    /// Delete a subject, its materials and their ratings atomically.
    ///
    /// Returns `None` when the subject does not exist.
    async fn delete(&self, id: &SubjectId)
    -> Result<Option<CascadeReport>, SubjectRepositoryError>;
}
