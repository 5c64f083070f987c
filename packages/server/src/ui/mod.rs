//! TCP chat server: accept loop, connection handlers and the server console.

mod console;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
