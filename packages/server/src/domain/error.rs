//! Domain error types.
//!
//! The `Display` strings of [`RegistryError`] are sent verbatim to users as
//! server replies.

use thiserror::Error;

use super::value_object::{RoomName, UserName};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("User name must not be empty")]
    EmptyUserName,

    #[error("Room name must not be empty")]
    EmptyRoomName,

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),
}

/// Room registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A live session already uses this name
    #[error("This user already exists, try another one")]
    DuplicateUser(UserName),

    /// No live session with this name
    #[error("User {0} is not connected")]
    UnknownUser(UserName),

    #[error("Room {0} already exists")]
    RoomAlreadyExists(RoomName),

    #[error("You are already connected to room {0}")]
    AlreadyInRoom(RoomName),

    #[error("Room {0} does not exist")]
    RoomNotFound(RoomName),

    #[error("You are not connected to any room")]
    NotInRoom,
}

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
