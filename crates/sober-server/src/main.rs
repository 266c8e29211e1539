use std::net::SocketAddr;

use tracing::{info, warn};

use sober_api::AppStateInner;
use sober_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sober=debug,sober_api=debug,sober_db=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "Configuration loaded");

    // Init database
    let db = sober_db::Database::open(&config.db_path)?;

    let addr: SocketAddr = config.listen_addr().parse()?;
    let state = AppStateInner::new(config, db)?;
    let app = sober_api::router(state);

    info!("Sober API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
