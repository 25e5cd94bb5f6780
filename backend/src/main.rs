//! Roster entry-point: loads settings, syncs the schema, then serves HTTP.

mod server;

use std::io;

use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roster::outbound::persistence::{DbPool, PoolConfig, sync_schema_blocking};
use roster::settings::RosterSettings;
use server::{ServerConfig, create_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Log a fatal startup failure and convert it for `main`.
fn startup_error(stage: &str, err: impl std::fmt::Display) -> io::Error {
    error!(stage, error = %err, "startup failed");
    io::Error::other(format!("{stage}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = RosterSettings::load().map_err(|e| startup_error("load settings", e))?;
    settings
        .validate()
        .map_err(|e| startup_error("validate settings", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("resolve bind address", e))?;
    let database_url = settings.database_path().to_string_lossy().into_owned();

    // The table must exist before the first request is accepted.
    sync_schema_blocking(database_url.clone())
        .await
        .map_err(|e| startup_error("sync schema", e))?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|e| startup_error("open connection pool", e))?;

    create_server(ServerConfig::new(bind_addr, pool))?.await
}
