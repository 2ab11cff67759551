//! Backend entry-point: loads settings, prepares the store and serves the API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::ServerSettings;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, run_migrations};
use backend::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut config = ServerConfig::new(bind_addr, settings.app_name());

    if let Some(pool_config) = settings
        .pool_config()
        .map_err(|e| std::io::Error::other(e.to_string()))?
    {
        if settings.run_migrations {
            run_migrations(pool_config.database_url())
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    info!(
        bind_addr = %config.bind_addr(),
        persistent = config.has_db_pool(),
        "ledger backend listening"
    );

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
