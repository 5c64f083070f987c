//! Connecting to the server with retry.

use std::time::Duration;

use parlor_shared::protocol::Intent;
use tokio::{io::AsyncWriteExt, net::TcpStream};

use crate::error::ClientError;

/// Deadline for opening the chat connection
pub const CHAT_CONNECT_DEADLINE: Duration = Duration::from_secs(10);
/// Deadline for opening a file transfer connection
pub const TRANSFER_CONNECT_DEADLINE: Duration = Duration::from_secs(5);
/// Pause between two connection attempts
pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Connect to `addr` and send the handshake line for `intent`.
///
/// Connection attempts are repeated every `interval` until `deadline`
/// elapses.
///
/// # Errors
///
/// * `ClientError::Timeout` - no attempt succeeded before the deadline
/// * `ClientError::Connection` - the handshake could not be written
pub async fn connect_with_retry(
    addr: &str,
    intent: &Intent,
    deadline: Duration,
    interval: Duration,
) -> Result<TcpStream, ClientError> {
    let attempts = async {
        let mut attempt = 1u32;
        loop {
            match TcpStream::connect(addr).await {
                Ok(stream) => return stream,
                Err(e) => {
                    tracing::debug!("Connection attempt {} to {} failed: {}", attempt, addr, e);
                    attempt += 1;
                    tokio::time::sleep(interval).await;
                }
            }
        }
    };

    let mut stream = tokio::time::timeout(deadline, attempts)
        .await
        .map_err(|_| ClientError::Timeout)?;

    stream
        .write_all(format!("{}\n", intent.to_line()).as_bytes())
        .await?;
    stream.flush().await?;
    tracing::debug!("Connected to {} as {:?}", addr, intent);
    Ok(stream)
}
