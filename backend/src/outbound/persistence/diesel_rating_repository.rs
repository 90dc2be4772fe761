//! PostgreSQL-backed `RatingRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RatingRepository, RatingRepositoryError};
use crate::domain::{MaterialId, Rating, RatingId, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::RatingRow;
use super::pool::{DbPool, PoolError};
use super::schema::ratings;

const MATERIAL_FKEY: &str = "ratings_material_id_fkey";
const USER_FKEY: &str = "ratings_user_id_fkey";

/// Diesel implementation of [`RatingRepository`].
#[derive(Clone)]
pub struct DieselRatingRepository {
    pool: DbPool,
}

impl DieselRatingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RatingRepositoryError {
    RatingRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: &DieselFailure) -> RatingRepositoryError {
    if failure.is_connection() {
        RatingRepositoryError::connection(failure.message())
    } else {
        RatingRepositoryError::query(failure.message())
    }
}

fn map_read_error(error: diesel::result::Error) -> RatingRepositoryError {
    map_failure(&classify_diesel_error(&error))
}

fn map_insert_error(error: &diesel::result::Error, rating: &Rating) -> RatingRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.violates(MATERIAL_FKEY) {
        RatingRepositoryError::material_not_found(*rating.material_id())
    } else if failure.violates(USER_FKEY) {
        RatingRepositoryError::user_not_found(*rating.user_id())
    } else {
        map_failure(&failure)
    }
}

fn rows_to_ratings(rows: Vec<RatingRow>) -> Result<Vec<Rating>, RatingRepositoryError> {
    rows.into_iter()
        .map(|row| {
            Rating::try_from(row)
                .map_err(|err| RatingRepositoryError::query(format!("invalid rating row: {err}")))
        })
        .collect()
}

#[async_trait]
impl RatingRepository for DieselRatingRepository {
    async fn insert(&self, rating: &Rating) -> Result<(), RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(ratings::table)
            .values(RatingRow::from(rating))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(&err, rating))
    }

    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = ratings::table
            .find(*id.as_uuid())
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows_to_ratings(rows)?.into_iter().next())
    }

    async fn list_by_material(
        &self,
        material_id: &MaterialId,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = ratings::table
            .filter(ratings::material_id.eq(*material_id.as_uuid()))
            .order((ratings::created_at.asc(), ratings::id.asc()))
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_ratings(rows)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = ratings::table
            .filter(ratings::user_id.eq(*user_id.as_uuid()))
            .order((ratings::created_at.asc(), ratings::id.asc()))
            .select(RatingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_ratings(rows)
    }

    async fn update(&self, rating: &Rating) -> Result<bool, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(ratings::table.find(*rating.id().as_uuid()))
            .set(ratings::score.eq(i16::from(rating.score().get())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &RatingId) -> Result<bool, RatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ratings::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }
}
