//! Wire message codec: one [`ChatMessage`] per newline-terminated JSON line.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::error::ProtocolError;

/// Sender name used for server-authored messages
pub const SERVER_NAME: &str = "Server";

/// A single chat record as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_name: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
            text: text.into(),
        }
    }

    /// Create a message authored by the server
    pub fn from_server(text: impl Into<String>) -> Self {
        Self::new(SERVER_NAME, text)
    }

    /// Encode as a single line, without the trailing newline.
    ///
    /// JSON string escaping guarantees the result never contains `\n`.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a line; a trailing `\r\n` or `\n` is ignored.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim_end_matches(['\r', '\n']))?)
    }
}

/// Write one message followed by a newline and flush.
pub async fn write_message<W>(writer: &mut W, message: &ChatMessage) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = message.encode()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read the next raw line.
///
/// Returns `Ok(None)` at end of stream.
pub async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Read and decode the next message.
///
/// Returns `Ok(None)` at end of stream.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<ChatMessage>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    match read_line(reader).await? {
        Some(line) => ChatMessage::decode(&line).map(Some),
        None => Ok(None),
    }
}
