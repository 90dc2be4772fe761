//! Material catalog: publishing, searching and curating study links.
//!
//! Only the uploader of a material may change or remove it. Mutations check,
//! in order, that the material exists, that a caller is present, and that the
//! caller is the uploader.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MaterialFilter, MaterialRepository, MaterialRepositoryError, RatingRepository,
    RatingRepositoryError, SubjectRepository, SubjectRepositoryError,
};
use crate::domain::rating::average_score;
use crate::domain::{
    CascadeReport, Caller, Error, Material, MaterialDraft, MaterialId, MaterialSummary,
    MaterialType, SubjectId, UserId,
};

/// Owns material records and enforces uploader ownership.
#[derive(Clone)]
pub struct MaterialCatalogService {
    materials: Arc<dyn MaterialRepository>,
    subjects: Arc<dyn SubjectRepository>,
    ratings: Arc<dyn RatingRepository>,
    clock: Arc<dyn Clock>,
}

fn not_found(id: &MaterialId) -> Error {
    Error::not_found(format!("material {id} not found"))
}

fn subject_not_found(id: &SubjectId) -> Error {
    Error::not_found(format!("subject {id} not found"))
}

fn map_material_error(error: MaterialRepositoryError) -> Error {
    match error {
        MaterialRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("material repository unavailable: {message}"))
        }
        MaterialRepositoryError::Query { message } => {
            Error::internal(format!("material repository error: {message}"))
        }
        MaterialRepositoryError::SubjectNotFound { subject_id } => subject_not_found(&subject_id),
        MaterialRepositoryError::UploaderNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

fn map_subject_error(error: SubjectRepositoryError) -> Error {
    match error {
        SubjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subject repository unavailable: {message}"))
        }
        other => Error::internal(format!("subject repository error: {other}")),
    }
}

fn map_rating_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        other => Error::internal(format!("rating repository error: {other}")),
    }
}

impl MaterialCatalogService {
    /// Create a service over the catalog repositories; `clock` stamps
    /// `created_at` on new materials.
    pub fn new(
        materials: Arc<dyn MaterialRepository>,
        subjects: Arc<dyn SubjectRepository>,
        ratings: Arc<dyn RatingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            materials,
            subjects,
            ratings,
            clock,
        }
    }

    async fn ensure_subject(&self, id: &SubjectId) -> Result<(), Error> {
        self.subjects
            .find_by_id(id)
            .await
            .map_err(map_subject_error)?
            .map(|_| ())
            .ok_or_else(|| subject_not_found(id))
    }

    /// Publish a material owned by the caller.
    pub async fn create(&self, draft: MaterialDraft, caller: Caller) -> Result<Material, Error> {
        let uploader = *caller.require()?;
        let content = draft.validate()?;
        self.ensure_subject(&content.subject_id).await?;

        let material = Material::new(MaterialId::random(), content, uploader, self.clock.utc());
        self.materials
            .insert(&material)
            .await
            .map_err(map_material_error)?;
        info!(
            material_id = %material.id(),
            subject_id = %material.subject_id(),
            uploader_id = %uploader,
            "published material"
        );
        Ok(material)
    }

    pub async fn get_by_id(&self, id: &MaterialId) -> Result<Material, Error> {
        self.materials
            .find_by_id(id)
            .await
            .map_err(map_material_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn list_filtered(&self, filter: MaterialFilter) -> Result<Vec<Material>, Error> {
        self.materials
            .list(&filter)
            .await
            .map_err(map_material_error)
    }

    pub async fn list(&self) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::All).await
    }

    pub async fn list_by_type(&self, material_type: MaterialType) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::ByType(material_type))
            .await
    }

    pub async fn list_by_subject(&self, subject_id: &SubjectId) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::BySubject(*subject_id))
            .await
    }

    pub async fn list_by_uploader(&self, uploader_id: &UserId) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::ByUploader(*uploader_id))
            .await
    }

    /// Materials whose title contains `needle`, ignoring case.
    pub async fn search_by_title(&self, needle: &str) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::TitleContains(needle.to_owned()))
            .await
    }

    /// Materials whose uploader's username contains `needle`, ignoring case.
    pub async fn search_by_uploader_username(&self, needle: &str) -> Result<Vec<Material>, Error> {
        self.list_filtered(MaterialFilter::UploaderUsernameContains(needle.to_owned()))
            .await
    }

    async fn load_owned(
        &self,
        id: &MaterialId,
        caller: Caller,
        action: &str,
    ) -> Result<Material, Error> {
        let material = self.get_by_id(id).await?;
        caller
            .require_owner(
                material.uploader_id(),
                &format!("only the uploader may {action} this material"),
            )
            .inspect_err(|_| {
                warn!(material_id = %id, caller = ?caller.user_id(), action, "rejected material mutation");
            })?;
        Ok(material)
    }

    /// Replace every editable field of a material the caller uploaded.
    pub async fn update(
        &self,
        id: &MaterialId,
        draft: MaterialDraft,
        caller: Caller,
    ) -> Result<Material, Error> {
        let material = self.load_owned(id, caller, "update").await?;
        let content = draft.validate()?;
        self.ensure_subject(&content.subject_id).await?;

        let updated = material.with_content(content);
        if !self
            .materials
            .update(&updated)
            .await
            .map_err(map_material_error)?
        {
            return Err(not_found(id));
        }
        info!(material_id = %id, "updated material");
        Ok(updated)
    }

    /// Delete a material the caller uploaded, together with its ratings.
    pub async fn delete(&self, id: &MaterialId, caller: Caller) -> Result<CascadeReport, Error> {
        self.load_owned(id, caller, "delete").await?;
        let ratings_removed = self
            .materials
            .delete(id)
            .await
            .map_err(map_material_error)?
            .ok_or_else(|| not_found(id))?;
        info!(material_id = %id, ratings_removed, "deleted material");
        Ok(CascadeReport {
            materials_removed: 1,
            ratings_removed,
        })
    }

    /// Material with its rating count and mean score.
    pub async fn summary(&self, id: &MaterialId) -> Result<MaterialSummary, Error> {
        let material = self.get_by_id(id).await?;
        let ratings = self
            .ratings
            .list_by_material(id)
            .await
            .map_err(map_rating_error)?;
        let (rating_count, average_score) = average_score(&ratings);
        Ok(MaterialSummary {
            material,
            rating_count,
            average_score,
        })
    }
}

#[cfg(test)]
#[path = "material_service_tests.rs"]
mod tests;
