//! Port for rating persistence.
use async_trait::async_trait;

use crate::domain::{MaterialId, Rating, RatingId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rating repository adapters.
    pub enum RatingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rating repository query failed: {message}",
        /// The rated material does not exist.
        MaterialNotFound { material_id: MaterialId } => "material {material_id} not found",
        /// The rater does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
    }
}

/// Port for recording and reading ratings.
///
/// Listings are ordered by `(created_at, id)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Record a rating. Fails when the material or rater is unknown.
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError>;

    /// Fetch a rating by identifier.
    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, RatingRepositoryError>;

    /// Ratings attached to a material.
    async fn list_by_material(
        &self,
        material_id: &MaterialId,
    ) -> Result<Vec<Rating>, RatingRepositoryError>;

    /// Ratings given by a user.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, RatingRepositoryError>;

    /// Overwrite the score of an existing rating. Returns `false` when the
    /// rating no longer exists.
    async fn update(&self, rating: &Rating) -> Result<bool, RatingRepositoryError>;

    /// Delete a rating. Returns `false` when it does not exist.
    async fn delete(&self, id: &RatingId) -> Result<bool, RatingRepositoryError>;
}
