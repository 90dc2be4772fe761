//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each repository port owns one aggregate and reports failures through a
//! typed error enum; services translate those into [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod material_repository;
mod rating_repository;
mod subject_repository;
mod user_repository;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError, FixtureCredentialHasher};
#[cfg(test)]
pub use material_repository::MockMaterialRepository;
pub use material_repository::{MaterialFilter, MaterialRepository, MaterialRepositoryError};
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::{RatingRepository, RatingRepositoryError};
#[cfg(test)]
pub use subject_repository::MockSubjectRepository;
pub use subject_repository::{SubjectRepository, SubjectRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
