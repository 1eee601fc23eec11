use std::sync::Arc;

use taskboard::config::{Config, LogFormat, StoreConfig};
use taskboard::store::{MemoryStore, PgStore, Store};
use taskboard::token::JwtKeys;
use taskboard::AppState;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    init_tracing(config.log_format);

    let store: Arc<dyn Store> = match &config.store {
        StoreConfig::Postgres { database_url } => Arc::new(
            PgStore::connect(database_url)
                .await
                .map_err(|e| format!("Error connecting DB: {e}"))?,
        ),
        StoreConfig::Memory => {
            warn!("using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, JwtKeys::new(&config.jwt_secret, config.jwt_ttl_secs));
    let app = taskboard::routes(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.addr()))?;

    info!(addr = %config.addr(), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.to_string())
}
