//! UseCase error types.

use thiserror::Error;

use crate::domain::RegistryError;

/// Errors of ConnectUserUseCase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("This user already exists, try another one")]
    DuplicateUserName(String),

    #[error(transparent)]
    Registry(RegistryError),
}

/// Errors of the room commands (create, join, quit).
///
/// The `Display` string is the reply sent to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCommandError {
    #[error(transparent)]
    Rejected(#[from] RegistryError),
}

/// Errors of SendMessageUseCase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// The sender is not in a room; the message has no effect
    #[error("You are not connected to any room")]
    NotInRoom,
}

/// Errors of the upload and download use cases.
///
/// The `Display` string is what the user sees in their chat session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("User {0} is not connected")]
    UnknownUser(String),

    #[error("You must join a room before transferring files")]
    NotInRoom,

    #[error("File {0} does not exist")]
    FileNotFound(String),

    #[error("File {0} is busy, try again later")]
    Busy(String),

    #[error("Error while {file} uploading: {reason}")]
    UploadFailed { file: String, reason: String },

    #[error("Error while {file} downloading: {reason}")]
    DownloadFailed { file: String, reason: String },
}
