//! Study materials catalog: subjects, shared materials and peer ratings.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the entities,
//! services and driven ports; [`outbound`] implements those ports over
//! PostgreSQL, an in-memory store and Argon2; [`inbound`] exposes the
//! services over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
