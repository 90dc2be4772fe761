//! PostgreSQL-backed `MaterialRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{MaterialFilter, MaterialRepository, MaterialRepositoryError};
use crate::domain::{Material, MaterialId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, like_pattern, pool_error_message,
};
use super::models::{MaterialChangeset, MaterialRow};
use super::pool::{DbPool, PoolError};
use super::schema::{materials, ratings, users};

const SUBJECT_FKEY: &str = "materials_subject_id_fkey";
const UPLOADER_FKEY: &str = "materials_uploader_id_fkey";

/// Diesel implementation of [`MaterialRepository`].
#[derive(Clone)]
pub struct DieselMaterialRepository {
    pool: DbPool,
}

impl DieselMaterialRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MaterialRepositoryError {
    MaterialRepositoryError::connection(pool_error_message(error))
}

fn map_failure(failure: &DieselFailure) -> MaterialRepositoryError {
    if failure.is_connection() {
        MaterialRepositoryError::connection(failure.message())
    } else {
        MaterialRepositoryError::query(failure.message())
    }
}

fn map_read_error(error: diesel::result::Error) -> MaterialRepositoryError {
    map_failure(&classify_diesel_error(&error))
}

fn map_write_error(error: &diesel::result::Error, material: &Material) -> MaterialRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.violates(SUBJECT_FKEY) {
        MaterialRepositoryError::subject_not_found(*material.subject_id())
    } else if failure.violates(UPLOADER_FKEY) {
        MaterialRepositoryError::uploader_not_found(*material.uploader_id())
    } else {
        map_failure(&failure)
    }
}

fn rows_to_materials(rows: Vec<MaterialRow>) -> Result<Vec<Material>, MaterialRepositoryError> {
    rows.into_iter()
        .map(|row| {
            Material::try_from(row).map_err(|err| {
                MaterialRepositoryError::query(format!("invalid material row: {err}"))
            })
        })
        .collect()
}

#[async_trait]
impl MaterialRepository for DieselMaterialRepository {
    async fn insert(&self, material: &Material) -> Result<(), MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(materials::table)
            .values(MaterialRow::from(material))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(&err, material))
    }

    async fn find_by_id(
        &self,
        id: &MaterialId,
    ) -> Result<Option<Material>, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = materials::table
            .find(*id.as_uuid())
            .select(MaterialRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows_to_materials(rows)?.into_iter().next())
    }

    async fn list(&self, filter: &MaterialFilter) -> Result<Vec<Material>, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = materials::table
            .inner_join(users::table)
            .select(MaterialRow::as_select())
            .order((materials::created_at.asc(), materials::id.asc()))
            .into_boxed();
        query = match filter {
            MaterialFilter::All => query,
            MaterialFilter::ByType(material_type) => {
                query.filter(materials::material_type.eq(material_type.as_str()))
            }
            MaterialFilter::BySubject(subject_id) => {
                query.filter(materials::subject_id.eq(*subject_id.as_uuid()))
            }
            MaterialFilter::ByUploader(user_id) => {
                query.filter(materials::uploader_id.eq(*user_id.as_uuid()))
            }
            MaterialFilter::TitleContains(needle) => {
                query.filter(materials::title.ilike(like_pattern(needle)))
            }
            MaterialFilter::UploaderUsernameContains(needle) => {
                query.filter(users::username.ilike(like_pattern(needle)))
            }
        };
        let rows = query.load(&mut conn).await.map_err(map_read_error)?;
        rows_to_materials(rows)
    }

    async fn update(&self, material: &Material) -> Result<bool, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = MaterialChangeset::from(material);
        let updated = diesel::update(materials::table.find(*material.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(&err, material))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &MaterialId) -> Result<Option<usize>, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let material_id = *id.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let ratings_removed =
                    diesel::delete(ratings::table.filter(ratings::material_id.eq(material_id)))
                        .execute(conn)
                        .await?;
                let materials_removed = diesel::delete(materials::table.find(material_id))
                    .execute(conn)
                    .await?;
                Ok((materials_removed > 0).then_some(ratings_removed))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }
}
