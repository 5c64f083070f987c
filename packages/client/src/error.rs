//! Error types for the chat client.

use parlor_shared::protocol::ProtocolError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// No connection could be made before the deadline
    #[error("Server timeout exceeded")]
    Timeout,

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The file cannot be named in a handshake
    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    /// The server sent no bytes for a download
    #[error("Nothing received for {0}, check the chat for the reason")]
    NothingReceived(String),

    #[error("Readline error: {0}")]
    Readline(String),
}
