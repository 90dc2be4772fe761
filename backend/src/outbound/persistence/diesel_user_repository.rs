//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CascadeReport, User, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{materials, ratings, users};

const USERNAME_KEY: &str = "users_username_key";
const EMAIL_KEY: &str = "users_email_key";

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_failure(failure: &DieselFailure) -> UserPersistenceError {
    if failure.is_connection() {
        UserPersistenceError::connection(failure.message())
    } else {
        UserPersistenceError::query(failure.message())
    }
}

/// Map a write failure, naming the duplicated value when a unique key fired.
fn map_write_error(error: &diesel::result::Error, user: &User) -> UserPersistenceError {
    let failure = classify_diesel_error(error);
    if failure.violates(USERNAME_KEY) {
        UserPersistenceError::duplicate_username(user.username().as_ref())
    } else if failure.violates(EMAIL_KEY) {
        UserPersistenceError::duplicate_email(user.email().as_ref())
    } else {
        map_failure(&failure)
    }
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_failure(&classify_diesel_error(&error))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row)
        .map_err(|err| UserPersistenceError::query(format!("invalid user row: {err}")))
}

/// Fetch at most one user matching `$filter`.
macro_rules! find_user {
    ($repo:expr, $filter:expr) => {{
        let mut conn = $repo.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter($filter)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(row_to_user)
            .transpose()
    }};
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(&err, user))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::id.eq(*id.as_uuid()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::username.eq(username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::email.eq(email))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .order(users::username.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?
            .into_iter()
            .map(row_to_user)
            .collect()
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileChangeset {
            username: user.username().as_ref(),
            email: user.email().as_ref(),
        };
        let updated = diesel::update(users::table.find(*user.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(&err, user))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<Option<CascadeReport>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *id.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let uploads = materials::table
                    .filter(materials::uploader_id.eq(user_id))
                    .select(materials::id);
                let ratings_removed = diesel::delete(
                    ratings::table.filter(
                        ratings::material_id
                            .eq_any(uploads)
                            .or(ratings::user_id.eq(user_id)),
                    ),
                )
                .execute(conn)
                .await?;
                let materials_removed =
                    diesel::delete(materials::table.filter(materials::uploader_id.eq(user_id)))
                        .execute(conn)
                        .await?;
                let users_removed = diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .await?;

                Ok((users_removed > 0).then_some(CascadeReport {
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
