//! Dispatch of a freshly accepted connection by its handshake.

use std::sync::Arc;

use parlor_shared::protocol::{Intent, ProtocolError, read_handshake};
use tokio::{io::BufReader, net::TcpStream};

use crate::ui::state::AppState;

use super::{session::run_session, transfer};

/// Read the handshake line and hand the connection to the chat session or
/// the file transfer handler.
pub async fn handle_connection(stream: TcpStream, state: Arc<AppState>) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let intent = match read_handshake(&mut reader).await {
        Ok(intent) => intent,
        Err(ProtocolError::ConnectionClosed) => {
            tracing::debug!("Connection closed before handshake");
            return;
        }
        Err(e) => {
            tracing::warn!("Failed to read handshake: {}", e);
            return;
        }
    };
    tracing::debug!("Handshake: {:?}", intent);

    match intent {
        Intent::Chat { user_name } => run_session(reader, write_half, user_name, state).await,
        Intent::Upload {
            user_name,
            file_name,
        } => transfer::handle_upload(reader, write_half, user_name, file_name, state).await,
        Intent::Download {
            user_name,
            file_name,
        } => transfer::handle_download(write_half, user_name, file_name, state).await,
    }
}
