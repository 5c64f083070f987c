//! Protocol error types.

use thiserror::Error;

/// Errors raised while reading or writing protocol lines
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed the connection before a complete line arrived
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// A line could not be decoded as a chat record
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Socket read or write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
