//! Users API entry-point: loads configuration, connects to the user store and
//! serves the REST endpoints once the store is reachable.

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use users_api::inbound::http::health::HealthState;
use users_api::inbound::http::state::HttpState;
use users_api::outbound::persistence::{
    DieselUserRepository, InMemoryUserRepository, PgConnector, StoreConnection, run_migrations,
};
use users_api::server::{AppConfig, AppDependencies, create_server, track_connection};

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

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load configuration; not listening");
            return wait_for_interrupt().await;
        }
    };

    let health_state = web::Data::new(HealthState::new());

    if config.in_memory {
        warn!("serving from process memory; data is lost on exit");
        let http_state = HttpState::from_repository(Arc::new(InMemoryUserRepository::new()));
        health_state.mark_ready();
        return serve(&config, http_state, health_state).await;
    }

    let pool_config = match config.pool_config() {
        Ok(pool_config) => pool_config,
        Err(err) => {
            error!(error = %err, "invalid configuration; not listening");
            return wait_for_interrupt().await;
        }
    };
    let database_url = pool_config.database_url().to_owned();

    let connection = StoreConnection::new(PgConnector::new(pool_config));
    tokio::spawn(track_connection(
        connection.subscribe(),
        health_state.clone(),
    ));

    let pool = match connection.connect().await {
        Ok(pool) => pool,
        Err(err) => {
            error!(error = %err, "could not reach user store; not listening");
            return wait_for_interrupt().await;
        }
    };

    if let Err(err) = run_migrations(&database_url).await {
        error!(error = %err, "schema migration failed; not listening");
        return wait_for_interrupt().await;
    }

    let monitor = connection.spawn_monitor(pool.clone(), config.health_check_interval());
    let http_state = HttpState::from_repository(Arc::new(DieselUserRepository::new(pool)));
    let result = serve(&config, http_state, health_state).await;
    monitor.abort();
    result
}

async fn serve(
    config: &AppConfig,
    http_state: HttpState,
    health_state: web::Data<HealthState>,
) -> std::io::Result<()> {
    let server = create_server(
        AppDependencies {
            http_state: web::Data::new(http_state),
            health_state: health_state.clone(),
        },
        config.host(),
        config.port,
    )?;
    info!(host = config.host(), port = config.port, "listening on port {}", config.port);
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn wait_for_interrupt() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("interrupt received; exiting");
    Ok(())
}
