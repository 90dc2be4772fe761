//! Subject catalog: named topics that materials are filed under.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::ports::{SubjectRepository, SubjectRepositoryError};
use crate::domain::{CascadeReport, Caller, Error, Subject, SubjectId, SubjectName};

/// Owns subject records and their name uniqueness.
#[derive(Clone)]
pub struct SubjectCatalogService {
    subjects: Arc<dyn SubjectRepository>,
}

fn duplicate_name(name: &str) -> Error {
    Error::conflict(format!("subject {name} already exists"))
        .with_details(json!({"field": "name", "code": "duplicate_name"}))
}

fn not_found(id: &SubjectId) -> Error {
    Error::not_found(format!("subject {id} not found"))
}

fn map_subject_error(error: SubjectRepositoryError) -> Error {
    match error {
        SubjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subject repository unavailable: {message}"))
        }
        SubjectRepositoryError::Query { message } => {
            Error::internal(format!("subject repository error: {message}"))
        }
        SubjectRepositoryError::DuplicateName { name } => duplicate_name(&name),
    }
}

impl SubjectCatalogService {
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { subjects }
    }

    /// Create a subject. Any authenticated user may do so.
    pub async fn create(&self, name: &str, caller: Caller) -> Result<Subject, Error> {
        caller.require()?;
        let name = SubjectName::new(name)?;
        if self
            .subjects
            .find_by_name(name.as_ref())
            .await
            .map_err(map_subject_error)?
            .is_some()
        {
            return Err(duplicate_name(name.as_ref()));
        }

        let subject = Subject::new(SubjectId::random(), name);
        self.subjects
            .insert(&subject)
            .await
            .map_err(map_subject_error)?;
        info!(subject_id = %subject.id(), name = %subject.name(), "created subject");
        Ok(subject)
    }

    pub async fn get_by_id(&self, id: &SubjectId) -> Result<Subject, Error> {
        self.subjects
            .find_by_id(id)
            .await
            .map_err(map_subject_error)?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Subject>, Error> {
        self.subjects.list().await.map_err(map_subject_error)
    }

    /// Case-insensitive substring search on the name. A blank or absent
    /// keyword lists everything.
    pub async fn search(&self, keyword: Option<&str>) -> Result<Vec<Subject>, Error> {
        match keyword.map(str::trim).filter(|keyword| !keyword.is_empty()) {
            Some(keyword) => self
                .subjects
                .search(keyword)
                .await
                .map_err(map_subject_error),
            None => self.list().await,
        }
    }

    /// Rename a subject, keeping names unique.
    pub async fn update(&self, id: &SubjectId, name: &str, caller: Caller) -> Result<Subject, Error> {
        let subject = self.get_by_id(id).await?;
        caller.require()?;
        let name = SubjectName::new(name)?;
        let holder = self
            .subjects
            .find_by_name(name.as_ref())
            .await
            .map_err(map_subject_error)?;
        if holder.is_some_and(|other| other.id() != id) {
            return Err(duplicate_name(name.as_ref()));
        }

        let renamed = subject.renamed(name);
        if !self
            .subjects
            .update(&renamed)
            .await
            .map_err(map_subject_error)?
        {
            return Err(not_found(id));
        }
        info!(subject_id = %id, name = %renamed.name(), "renamed subject");
        Ok(renamed)
    }

    /// Delete a subject with all of its materials and their ratings.
    pub async fn delete(&self, id: &SubjectId, caller: Caller) -> Result<CascadeReport, Error> {
        self.get_by_id(id).await?;
        caller.require()?;
        let report = self
            .subjects
            .delete(id)
            .await
            .map_err(map_subject_error)?
            .ok_or_else(|| not_found(id))?;
        info!(
            subject_id = %id,
            materials_removed = report.materials_removed,
            ratings_removed = report.ratings_removed,
            "deleted subject"
        );
        Ok(report)
    }
}
