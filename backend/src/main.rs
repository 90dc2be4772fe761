//! Backend entry-point: loads configuration, picks a storage backend and
//! serves the catalog API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerSettings, create_server};
use study_materials::inbound::http::health::HealthState;
use study_materials::inbound::http::session_config::{BuildMode, session_settings_from_env};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &settings, session).await?;
    server.await?;
    health_state.mark_draining();
    Ok(())
}
