//! Booking server entry point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use vaxbook::inbound::http::health::HealthState;
use vaxbook::inbound::http::token_config::{BuildMode, token_settings_from_env};
use vaxbook::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("load server settings")?;
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("load token settings")?;

    let mut config = ServerConfig::new(settings.bind_addr(), tokens, settings.hospital_binding());
    if let Some(url) = settings.database_url() {
        run_migrations(url).await.wrap_err("apply migrations")?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("connect to PostgreSQL")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting booking server");
    let server = create_server(health_state.clone(), config).wrap_err("bind listener")?;
    server.await?;
    health_state.mark_draining();
    Ok(())
}
