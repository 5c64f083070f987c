//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod file_store;
pub mod message_pusher;
pub mod repository;
