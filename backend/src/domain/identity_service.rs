//! Identity store: registration, authentication and profile management.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, UserPersistenceError, UserRepository,
};
use crate::domain::user::validate_password;
use crate::domain::{
    CascadeReport, Caller, Email, Error, LoginCredentials, RegistrationRequest, User, UserId,
    UserProfileUpdate, Username,
};

/// Owns user records and credential verification.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

fn duplicate_username(username: &str) -> Error {
    Error::conflict(format!("username {username} is already taken"))
        .with_details(json!({"field": "username", "code": "duplicate_username"}))
}

fn duplicate_email(email: &str) -> Error {
    Error::conflict(format!("email {email} is already registered"))
        .with_details(json!({"field": "email", "code": "duplicate_email"}))
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => duplicate_username(&username),
        UserPersistenceError::DuplicateEmail { email } => duplicate_email(&email),
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

impl IdentityService {
    /// Create a service over the given repository and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new user.
    ///
    /// Fails with `Conflict` when the username or email is taken; nothing is
    /// stored in that case.
    pub async fn register(&self, request: RegistrationRequest) -> Result<User, Error> {
        let RegistrationRequest {
            username,
            email,
            password,
            role,
        } = request;
        let username = Username::new(username)?;
        let email = Email::new(email)?;
        validate_password(&password)?;

        if self.exists_by_username(username.as_ref()).await? {
            return Err(duplicate_username(username.as_ref()));
        }
        if self.exists_by_email(email.as_ref()).await? {
            return Err(duplicate_email(email.as_ref()));
        }

        let digest = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let user = User::new(UserId::random(), username, email, digest, role);
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "registered user");
        Ok(user)
    }

    /// Verify credentials and return the matching user.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?;
        match user {
            Some(user) if self.hasher.verify(credentials.password(), user.password()) => Ok(user),
            _ => {
                warn!("rejected login attempt");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }

    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }

    /// Turn a session's user id into a [`Caller`].
    ///
    /// Sessions can outlive their account; an id with no stored user acts
    /// anonymously.
    pub async fn resolve_caller(&self, user_id: Option<UserId>) -> Result<Caller, Error> {
        let Some(id) = user_id else {
            return Ok(Caller::Anonymous);
        };
        let known = self.get_by_id(&id).await?.map(|user| *user.id());
        if known.is_none() {
            info!(user_id = %id, "session refers to a deleted account");
        }
        Ok(Caller::from_session(known))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        self.users
            .find_by_username(username.trim())
            .await
            .map_err(map_user_error)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email.trim())
            .await
            .map_err(map_user_error)
    }

    /// All registered users.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }

    pub async fn exists_by_username(&self, username: &str) -> Result<bool, Error> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, Error> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    async fn load_owned(&self, id: &UserId, caller: Caller, action: &str) -> Result<User, Error> {
        let user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        caller
            .require_owner(user.id(), &format!("users may only {action} their own account"))
            .inspect_err(|_| {
                warn!(user_id = %id, caller = ?caller.user_id(), action, "rejected user mutation");
            })?;
        Ok(user)
    }

    /// Replace the caller's username and email.
    pub async fn update(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
        caller: Caller,
    ) -> Result<User, Error> {
        let user = self.load_owned(id, caller, "update").await?;
        let username = Username::new(update.username)?;
        let email = Email::new(update.email)?;

        let username_holder = self.get_by_username(username.as_ref()).await?;
        if username_holder.is_some_and(|other| other.id() != id) {
            return Err(duplicate_username(username.as_ref()));
        }
        let email_holder = self.get_by_email(email.as_ref()).await?;
        if email_holder.is_some_and(|other| other.id() != id) {
            return Err(duplicate_email(email.as_ref()));
        }

        let updated = user.with_profile(username, email);
        if !self.users.update(&updated).await.map_err(map_user_error)? {
            return Err(Error::not_found(format!("user {id} not found")));
        }
        info!(user_id = %id, "updated user profile");
        Ok(updated)
    }

    /// Delete the caller's account together with their materials and ratings.
    pub async fn delete(&self, id: &UserId, caller: Caller) -> Result<CascadeReport, Error> {
        self.load_owned(id, caller, "delete").await?;
        let report = self
            .users
            .delete(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        info!(
            user_id = %id,
            materials_removed = report.materials_removed,
            ratings_removed = report.ratings_removed,
            "deleted user"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
