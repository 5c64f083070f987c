//! Client input grammar.
//!
//! ```text
//! /close               close the chat connection
//! /send <path>         upload a local file to the current room
//! /download <name>     download a file uploaded to the current room
//! anything else        sent as a chat message
//! ```

use std::path::{Path, PathBuf};

use parlor_shared::protocol::{DOWNLOAD_MARKER, UPLOAD_MARKER};

pub const CLOSE: &str = "/close";

/// What a typed line asks the client to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    CloseConnection,
    SendFile(PathBuf),
    DownloadFile(String),
    Message(String),
}

impl ClientCommand {
    /// Classify a typed line.
    ///
    /// `file_exists` decides whether a `/send` path names a readable local
    /// file; when it does not, only the marker itself is sent as a message.
    pub fn parse(text: &str, file_exists: impl Fn(&Path) -> bool) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        match tokens.as_slice() {
            [CLOSE] => ClientCommand::CloseConnection,
            [UPLOAD_MARKER, path] => {
                let path = PathBuf::from(path);
                if file_exists(&path) {
                    ClientCommand::SendFile(path)
                } else {
                    ClientCommand::Message(UPLOAD_MARKER.to_string())
                }
            }
            [DOWNLOAD_MARKER, file_name] => ClientCommand::DownloadFile(file_name.to_string()),
            _ => ClientCommand::Message(text.to_string()),
        }
    }
}

/// Parse a line against the local file system
pub fn parse_input(text: &str) -> ClientCommand {
    ClientCommand::parse(text, Path::is_file)
}
