use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use super::routes::create_router;
use crate::config::ServerConfig;
use crate::state::Conversations;

pub async fn start_server(config: ServerConfig, shutdown_rx: watch::Receiver<bool>) -> Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!("Chatbox server listening on http://{}", listener.local_addr()?);

    serve(listener, Conversations::new(), shutdown_rx).await
}

/// Serves the API on an already bound listener until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    conversations: Conversations,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let app = create_router(conversations);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: watch::Receiver<bool>) {
    // Wait for shutdown signal
    while !*shutdown_rx.borrow() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }
    info!("Shutting down API server...");
}
