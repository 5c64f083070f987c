//! Server execution logic.

use std::{future::Future, io, sync::Arc};

use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use super::{console, handler::handle_connection, signal::shutdown_signal, state::AppState};

/// TCP room chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, true);
/// server.run("127.0.0.1".to_string(), 1900).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Read commands from stdin while serving
    console: bool,
}

impl Server {
    pub fn new(state: AppState, console: bool) -> Self {
        Self {
            state: Arc::new(state),
            console,
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        if self.console {
            console::spawn(self.state.clone());
        }

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Every connection is handled on its own task; the loop never waits on
    /// client I/O.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Stopped accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let connection_id = Uuid::new_v4();
                        tracing::debug!("Accepted connection {} from {}", connection_id, peer);
                        let span = tracing::info_span!("connection", id = %connection_id, %peer);
                        tokio::spawn(
                            handle_connection(stream, self.state.clone()).instrument(span),
                        );
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        Ok(())
    }
}
