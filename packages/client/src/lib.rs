//! Parlor chat client library.
//!
//! Connects to a Parlor server, renders incoming messages and turns typed
//! lines into chat messages, file uploads and file downloads.

pub mod command;
pub mod connection;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod transfer;
pub mod ui;

pub use error::ClientError;
pub use runner::{ClientConfig, run_client};
