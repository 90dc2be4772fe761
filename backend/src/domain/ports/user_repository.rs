//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{CascadeReport, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername { username: String } => "username {username} is already taken",
        /// Another user already holds the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Port for storing and looking up users.
///
/// Username and email lookups are exact matches on the stored, trimmed form.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, rejecting duplicate usernames or emails.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// List all users ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite the profile of an existing user. Returns `false` when the
    /// user no longer exists.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Delete a user together with their materials and ratings.
    ///
    /// Returns `None` when the user does not exist. The removal is atomic.
    async fn delete(&self, id: &UserId) -> Result<Option<CascadeReport>, UserPersistenceError>;
}
