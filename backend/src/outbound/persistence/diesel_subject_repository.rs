//! PostgreSQL-backed `SubjectRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{SubjectRepository, SubjectRepositoryError};
use crate::domain::{CascadeReport, Subject, SubjectId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, like_pattern, pool_error_message,
};
use super::models::SubjectRow;
use super::pool::{DbPool, PoolError};
use super::schema::{materials, ratings, subjects};

const NAME_KEY: &str = "subjects_name_key";

/// Diesel implementation of [`SubjectRepository`].
#[derive(Clone)]
pub struct DieselSubjectRepository {
    pool: DbPool,
}

impl DieselSubjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubjectRepositoryError {
    SubjectRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: &DieselFailure) -> SubjectRepositoryError {
    if failure.is_connection() {
        SubjectRepositoryError::connection(failure.message())
    } else {
        SubjectRepositoryError::query(failure.message())
    }
}

fn map_read_error(error: diesel::result::Error) -> SubjectRepositoryError {
    map_failure(&classify_diesel_error(&error))
}

fn map_write_error(error: &diesel::result::Error, subject: &Subject) -> SubjectRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.violates(NAME_KEY) {
        SubjectRepositoryError::duplicate_name(subject.name().as_ref())
    } else {
        map_failure(&failure)
    }
}

fn rows_to_subjects(rows: Vec<SubjectRow>) -> Result<Vec<Subject>, SubjectRepositoryError> {
    rows.into_iter()
        .map(|row| {
            Subject::try_from(row).map_err(|err| {
                SubjectRepositoryError::query(format!("invalid subject row: {err}"))
            })
        })
        .collect()
}

#[async_trait]
impl SubjectRepository for DieselSubjectRepository {
    async fn insert(&self, subject: &Subject) -> Result<(), SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subjects::table)
            .values(SubjectRow::from(subject))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(&err, subject))
    }

    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = subjects::table
            .find(*id.as_uuid())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows_to_subjects(rows)?.into_iter().next())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = subjects::table
            .filter(subjects::name.eq(name))
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows_to_subjects(rows)?.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = subjects::table
            .order(subjects::name.asc())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_subjects(rows)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Subject>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = subjects::table
            .filter(subjects::name.ilike(like_pattern(keyword)))
            .order(subjects::name.asc())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows_to_subjects(rows)
    }

    async fn update(&self, subject: &Subject) -> Result<bool, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(subjects::table.find(*subject.id().as_uuid()))
            .set(subjects::name.eq(subject.name().as_ref()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(&err, subject))?;
        Ok(updated > 0)
    }

    async fn delete(
        &self,
        id: &SubjectId,
    ) -> Result<Option<CascadeReport>, SubjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let subject_id = *id.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let filed = materials::table
                    .filter(materials::subject_id.eq(subject_id))
                    .select(materials::id);
                let ratings_removed =
                    diesel::delete(ratings::table.filter(ratings::material_id.eq_any(filed)))
                        .execute(conn)
                        .await?;
                let materials_removed =
                    diesel::delete(materials::table.filter(materials::subject_id.eq(subject_id)))
                        .execute(conn)
                        .await?;
                let subjects_removed = diesel::delete(subjects::table.find(subject_id))
                    .execute(conn)
                    .await?;

                Ok((subjects_removed > 0).then_some(CascadeReport {
                    materials_removed,
                    ratings_removed,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }
}
