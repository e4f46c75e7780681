use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lesson_store::{api::create_router, application::builder::ApplicationBuilder, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting LessonStore service");

    let config = Config::from_env();
    config.validate()?;
    info!("Configuration loaded and validated");

    let listen_addr = config.listen_addr.clone();
    let grace = Duration::from_secs(config.refresh_shutdown_grace_secs);

    let (state, refresh_pool) = ApplicationBuilder::new(config)
        .with_database()
        .await?
        .with_cache()?
        .with_infrastructure()?
        .build()?;

    let app = create_router(state);

    info!("Listening on {}", listen_addr);
    let listener = TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !refresh_pool.shutdown(grace).await {
        tracing::warn!("Background refreshes cancelled after {:?} grace period", grace);
    }
    info!(stats = ?refresh_pool.stats(), "Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
