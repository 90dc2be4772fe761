//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between row structs and domain types; all
//! rules live in the domain services. Cascading deletes run inside a single
//! transaction and report exactly what they removed, while the schema's
//! `ON DELETE CASCADE` keys keep the tables consistent even for writes that
//! bypass these adapters.
//!
//! ```no_run
//! use study_materials::outbound::persistence::{DbPool, DieselSubjectRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/catalog")).await?;
//! let subjects = DieselSubjectRepository::new(pool);
//! # let _ = subjects;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_material_repository;
mod diesel_rating_repository;
mod diesel_subject_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_material_repository::DieselMaterialRepository;
pub use diesel_rating_repository::DieselRatingRepository;
pub use diesel_subject_repository::DieselSubjectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
