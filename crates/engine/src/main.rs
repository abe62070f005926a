use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use chatbox_engine::api;
use chatbox_engine::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    info!(bind = %config.bind, "Starting Chatbox server");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start API server
    let mut api_handle = tokio::spawn(async move {
        if let Err(e) = api::start_server(config, shutdown_rx).await {
            error!("API server crashed: {}", e);
        }
    });

    // Wait for Ctrl+C, unless the server stops first
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received shutdown signal...");
            let _ = shutdown_tx.send(true);
            let _ = api_handle.await;
        }
        _ = &mut api_handle => {}
    }

    info!("Chatbox server shutdown complete.");
    Ok(())
}
