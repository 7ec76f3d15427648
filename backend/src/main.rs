//! Service entry-point: loads configuration, prepares persistence and runs
//! the page server.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bazaar::inbound::http::health::HealthState;
use bazaar::inbound::http::session_config::fingerprint::key_fingerprint;
use bazaar::inbound::http::session_config::{BuildMode, session_settings_from_env};
use bazaar::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Run migrations and open the connection pool for `database_url`.
async fn connect_database(database_url: &str, max_size: u32) -> std::io::Result<DbPool> {
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool setup failed: {err}")))
}

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

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("configuration error: {err}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        ttl_hours = session.ttl_hours,
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        SameSite::Lax,
        settings.bind_addr()?,
    )
    .with_session_ttl_hours(session.ttl_hours);

    let mut health_state = HealthState::new();
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = connect_database(url, settings.pool_max_size()).await?;
            health_state = health_state.with_pool(pool.clone());
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; state is held in memory and lost on exit"),
    }

    let server = create_server(web::Data::new(health_state), config)?;
    server.await
}
