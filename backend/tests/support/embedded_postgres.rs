//! Embedded PostgreSQL databases for the Diesel repository suites.
//!
//! Every test gets its own database on one shared cluster, migrated with the
//! catalog schema. Tests stay synchronous and drive the repositories through
//! the runtime held by [`PgCatalog`], because cluster bootstrap must not run
//! inside a Tokio runtime.

use std::fmt::Display;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use study_materials::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tokio::runtime::Runtime;

/// A migrated database, a pool over it and the runtime that drives the pool.
///
/// Field order matters: the pool closes its connections before the runtime
/// stops, and the database is dropped last.
pub struct PgCatalog {
    pub pool: DbPool,
    pub runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgCatalog {
    /// Run `future` to completion on the suite's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Whether `SKIP_TEST_CLUSTER` asks to skip suites that need the cluster.
///
/// Truthy values: "1", "true", "yes" (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when allowed, otherwise fail loudly so CI breakage is not masked.
#[allow(clippy::print_stderr, reason = "skip marker belongs in the test log")]
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn provision() -> Result<PgCatalog, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_owned();
    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(&url).with_max_size(4))
            .await
            .map_err(|err| err.to_string())
    })?;
    Ok(PgCatalog {
        pool,
        runtime,
        _database: database,
    })
}

/// Fresh migrated database, or `None` when the cluster is unavailable and
/// skipping is allowed.
pub fn pg_catalog() -> Option<PgCatalog> {
    match provision() {
        Ok(catalog) => Some(catalog),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
