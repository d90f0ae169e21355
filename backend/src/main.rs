//! Backend entry-point: loads settings, migrates, and serves the JSON API.

mod server;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use questionnaire_backend::inbound::http::health::HealthState;
use questionnaire_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use questionnaire_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load().map_err(|err| {
        std::io::Error::other(format!("failed to load settings: {err}"))
    })?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let cors_origins = settings.cors_allowed_origins();
    info!(origins = ?cors_origins, "CORS allowed origins (empty accepts any)");
    let config = ServerConfig::new(bind_addr, pool)
        .with_caller(settings.admin_user_id())
        .with_cors_origins(cors_origins);
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, caller = %settings.admin_user_id(), "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    if let Err(err) = &result {
        error!(error = %err, "server stopped with error");
    }
    result
}
