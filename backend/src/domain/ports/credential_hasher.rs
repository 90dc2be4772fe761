//! Port for deriving and checking password digests.
//!
//! The algorithm is an adapter concern; production uses Argon2id while tests
//! substitute the cheap [`FixtureCredentialHasher`].

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a credential.
    pub enum CredentialHasherError {
        /// The hasher rejected its input or parameters.
        Hash { message: String } => "credential hashing failed: {message}",
    }
}

/// Port for one-way credential digests.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Derive a digest for storage.
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// Malformed digests verify as `false`.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> bool;
}

/// Reversible stand-in used by tests that do not care about hashing cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialHasher;

impl FixtureCredentialHasher {
    const PREFIX: &'static str = "fixture$";
}

impl CredentialHasher for FixtureCredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError> {
        Ok(PasswordDigest::new(format!("{}{password}", Self::PREFIX)))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> bool {
        digest
            .as_str()
            .strip_prefix(Self::PREFIX)
            .is_some_and(|stored| stored == password)
    }
}
