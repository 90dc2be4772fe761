//! Rating ledger: peer scores attached to materials.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    MaterialRepository, MaterialRepositoryError, RatingRepository, RatingRepositoryError,
};
use crate::domain::{Caller, Error, MaterialId, Rating, RatingId, Score, UserId};

/// Owns rating records and score bounds.
#[derive(Clone)]
pub struct RatingLedgerService {
    ratings: Arc<dyn RatingRepository>,
    materials: Arc<dyn MaterialRepository>,
    clock: Arc<dyn Clock>,
}

fn not_found(id: &RatingId) -> Error {
    Error::not_found(format!("rating {id} not found"))
}

fn material_not_found(id: &MaterialId) -> Error {
    Error::not_found(format!("material {id} not found"))
}

fn map_rating_error(error: RatingRepositoryError) -> Error {
    match error {
        RatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        RatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
        RatingRepositoryError::MaterialNotFound { material_id } => {
            material_not_found(&material_id)
        }
        RatingRepositoryError::UserNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

fn map_material_error(error: MaterialRepositoryError) -> Error {
    match error {
        MaterialRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("material repository unavailable: {message}"))
        }
        other => Error::internal(format!("material repository error: {other}")),
    }
}

impl RatingLedgerService {
    pub fn new(
        ratings: Arc<dyn RatingRepository>,
        materials: Arc<dyn MaterialRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ratings,
            materials,
            clock,
        }
    }

    async fn ensure_material(&self, id: &MaterialId) -> Result<(), Error> {
        self.materials
            .find_by_id(id)
            .await
            .map_err(map_material_error)?
            .map(|_| ())
            .ok_or_else(|| material_not_found(id))
    }

    /// Record the caller's score for a material.
    ///
    /// Scores outside 1..=5 are rejected, never clamped. A user may rate the
    /// same material repeatedly.
    pub async fn create(
        &self,
        material_id: &MaterialId,
        score: i64,
        caller: Caller,
    ) -> Result<Rating, Error> {
        let rater = *caller.require()?;
        self.ensure_material(material_id).await?;
        let score = Score::new(score)?;

        let rating = Rating::new(
            RatingId::random(),
            score,
            *material_id,
            rater,
            self.clock.utc(),
        );
        self.ratings
            .insert(&rating)
            .await
            .map_err(map_rating_error)?;
        info!(
            rating_id = %rating.id(),
            material_id = %material_id,
            score = score.get(),
            "recorded rating"
        );
        Ok(rating)
    }

    pub async fn get_by_id(&self, id: &RatingId) -> Result<Rating, Error> {
        self.ratings
            .find_by_id(id)
            .await
            .map_err(map_rating_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Ratings of an existing material.
    pub async fn list_by_material(&self, material_id: &MaterialId) -> Result<Vec<Rating>, Error> {
        self.ensure_material(material_id).await?;
        self.ratings
            .list_by_material(material_id)
            .await
            .map_err(map_rating_error)
    }

    pub async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, Error> {
        self.ratings
            .list_by_user(user_id)
            .await
            .map_err(map_rating_error)
    }

    async fn load_owned(&self, id: &RatingId, caller: Caller, action: &str) -> Result<Rating, Error> {
        let rating = self.get_by_id(id).await?;
        caller
            .require_owner(
                rating.user_id(),
                &format!("only the rater may {action} this rating"),
            )
            .inspect_err(|_| {
                warn!(rating_id = %id, caller = ?caller.user_id(), action, "rejected rating mutation");
            })?;
        Ok(rating)
    }

    /// Change the score of a rating the caller gave.
    pub async fn update_score(
        &self,
        id: &RatingId,
        score: i64,
        caller: Caller,
    ) -> Result<Rating, Error> {
        let rating = self.load_owned(id, caller, "update").await?;
        let updated = rating.with_score(Score::new(score)?);
        if !self
            .ratings
            .update(&updated)
            .await
            .map_err(map_rating_error)?
        {
            return Err(not_found(id));
        }
        info!(rating_id = %id, score = updated.score().get(), "updated rating");
        Ok(updated)
    }

    /// Remove a rating the caller gave.
    pub async fn delete(&self, id: &RatingId, caller: Caller) -> Result<(), Error> {
        self.load_owned(id, caller, "delete").await?;
        if !self.ratings.delete(id).await.map_err(map_rating_error)? {
            return Err(not_found(id));
        }
        info!(rating_id = %id, "deleted rating");
        Ok(())
    }
}
