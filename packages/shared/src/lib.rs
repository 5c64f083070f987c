//! Code shared by the Parlor server and client.
//!
//! - `protocol`: the wire record codec and the connection handshake
//! - `logger`: tracing subscriber setup for the binaries
//! - `time`: clock abstraction and event time formatting

pub mod logger;
pub mod protocol;
pub mod time;
