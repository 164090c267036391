//! Service entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use reviewer_service::config::ServiceSettings;
use reviewer_service::inbound::http::health::HealthState;
use reviewer_service::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

async fn connect_storage(settings: &ServiceSettings, url: &str) -> io::Result<DbPool> {
    if settings.run_migrations {
        let applied = run_migrations(url).await.map_err(io::Error::other)?;
        info!(applied, "database migrations applied");
    }
    let pool_config = PoolConfig::new(url).with_max_size(settings.pool_max_size());
    DbPool::new(pool_config).await.map_err(io::Error::other)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr).with_rng_seed(settings.rng_seed);
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect_storage(&settings, url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "reviewer service listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
