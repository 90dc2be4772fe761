//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories over Diesel and `bb8`.
//! - **memory**: a single-mutex store used by tests and database-less runs.
//! - **credentials**: the Argon2id [`CredentialHasher`](crate::domain::ports::CredentialHasher).
//!
//! Adapters translate representations and map failures; they hold no
//! catalog rules.

pub mod credentials;
pub mod memory;
pub mod persistence;
