//! Shutdown signal handling.

/// Resolves when the process receives Ctrl+C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            // Without a signal handler, keep serving until the process is killed
            std::future::pending::<()>().await;
        }
    }
}
