mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use combodb_discovery::{Discovery, DiscoverySettings};
use combodb_geocode::ConfiguredGeocoder;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = combodb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = combodb_db::PoolConfig::from_app_config(&config);
    let pool = combodb_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = combodb_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let store = Arc::new(combodb_db::PgCatalog::new(pool));
    let geocoder = Arc::new(ConfiguredGeocoder::from_app_config(&config)?);
    let settings = DiscoverySettings::from_app_config(&config);
    let discovery = Discovery::new(Arc::clone(&store), geocoder, settings);

    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(AppState::new(store, discovery), rate_limit);

    tracing::info!(addr = %config.bind_addr, env = %config.env, "combodb-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
