//! Connection handshake.
//!
//! The first line of every connection declares what the connection is for:
//!
//! ```text
//! <userName>                          chat session
//! /send <userName> <fileName>         upload, raw file bytes follow
//! /download <userName> <fileName>     download, the server streams the file
//! ```

use tokio::io::AsyncBufRead;

use super::{error::ProtocolError, message::read_line};

/// Marker token opening an upload handshake
pub const UPLOAD_MARKER: &str = "/send";
/// Marker token opening a download handshake
pub const DOWNLOAD_MARKER: &str = "/download";

/// Purpose of a connection, as declared by its handshake line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Chat {
        user_name: String,
    },
    Upload {
        user_name: String,
        file_name: String,
    },
    Download {
        user_name: String,
        file_name: String,
    },
}

impl Intent {
    /// Classify a handshake line.
    ///
    /// A marker line with the wrong number of arguments is not an error: it
    /// becomes a chat session whose user name is the marker token itself.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [UPLOAD_MARKER, user_name, file_name] => Intent::Upload {
                user_name: user_name.to_string(),
                file_name: file_name.to_string(),
            },
            [DOWNLOAD_MARKER, user_name, file_name] => Intent::Download {
                user_name: user_name.to_string(),
                file_name: file_name.to_string(),
            },
            [marker, ..] if *marker == UPLOAD_MARKER || *marker == DOWNLOAD_MARKER => Intent::Chat {
                user_name: marker.to_string(),
            },
            _ => Intent::Chat {
                user_name: line.to_string(),
            },
        }
    }

    /// Render the handshake line (without the trailing newline)
    pub fn to_line(&self) -> String {
        match self {
            Intent::Chat { user_name } => user_name.clone(),
            Intent::Upload {
                user_name,
                file_name,
            } => format!("{} {} {}", UPLOAD_MARKER, user_name, file_name),
            Intent::Download {
                user_name,
                file_name,
            } => format!("{} {} {}", DOWNLOAD_MARKER, user_name, file_name),
        }
    }

    pub fn user_name(&self) -> &str {
        match self {
            Intent::Chat { user_name }
            | Intent::Upload { user_name, .. }
            | Intent::Download { user_name, .. } => user_name,
        }
    }
}

/// Read the handshake line of a freshly accepted connection.
///
/// # Errors
///
/// * `ProtocolError::ConnectionClosed` - the peer closed before sending a line
/// * `ProtocolError::Io` - the socket read failed
pub async fn read_handshake<R>(reader: &mut R) -> Result<Intent, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    match read_line(reader).await? {
        Some(line) => Ok(Intent::parse(&line)),
        None => Err(ProtocolError::ConnectionClosed),
    }
}
