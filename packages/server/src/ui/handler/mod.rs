//! Connection handlers.

mod connection;
mod session;
mod transfer;

pub use connection::handle_connection;
