//! Line-based wire protocol shared by client and server.
//!
//! Every connection starts with a handshake line (see [`handshake`]) that
//! declares its purpose. Chat connections then exchange one JSON-encoded
//! [`ChatMessage`] per line; transfer connections carry raw file bytes.

pub mod error;
pub mod handshake;
pub mod message;

pub use error::ProtocolError;
pub use handshake::{DOWNLOAD_MARKER, Intent, UPLOAD_MARKER, read_handshake};
pub use message::{ChatMessage, SERVER_NAME, read_line, read_message, write_message};
