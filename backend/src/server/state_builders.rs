//! Builders choosing the storage backend behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use study_materials::inbound::http::state::{HttpState, HttpStatePorts};
use study_materials::outbound::credentials::Argon2CredentialHasher;
use study_materials::outbound::memory::InMemoryCatalogStore;
use study_materials::outbound::persistence::{
    DbPool, DieselMaterialRepository, DieselRatingRepository, DieselSubjectRepository,
    DieselUserRepository, PoolConfig, run_pending_migrations,
};

use super::ServerSettings;

fn in_memory_ports() -> HttpStatePorts {
    let store = Arc::new(InMemoryCatalogStore::new());
    HttpStatePorts {
        users: store.clone(),
        subjects: store.clone(),
        materials: store.clone(),
        ratings: store,
        hasher: Arc::new(Argon2CredentialHasher),
        clock: Arc::new(DefaultClock),
    }
}

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        subjects: Arc::new(DieselSubjectRepository::new(pool.clone())),
        materials: Arc::new(DieselMaterialRepository::new(pool.clone())),
        ratings: Arc::new(DieselRatingRepository::new(pool.clone())),
        hasher: Arc::new(Argon2CredentialHasher),
        clock: Arc::new(DefaultClock),
    }
}

/// Build the HTTP state over PostgreSQL when a database URL is configured,
/// otherwise over a fresh in-memory store.
///
/// # Errors
///
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub async fn build_http_state(settings: &ServerSettings) -> std::io::Result<web::Data<HttpState>> {
    let Some(url) = settings.database_url() else {
        warn!("no database configured; catalog data lives in memory only");
        return Ok(web::Data::new(HttpState::new(in_memory_ports())));
    };

    run_pending_migrations(url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;

    let mut config = PoolConfig::new(url);
    if let Some(max_size) = settings.pool_max_size {
        config = config.with_max_size(max_size);
    }
    let max_size = config.max_size();
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
    info!(max_size, "connected to PostgreSQL");

    Ok(web::Data::new(HttpState::new(diesel_ports(&pool))))
}
