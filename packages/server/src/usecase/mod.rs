//! UseCase layer: one application operation per module.

mod broadcast;
mod connect_user;
mod create_room;
mod disconnect_user;
mod download_file;
mod error;
mod join_room;
mod list_clients;
mod quit_room;
mod send_message;
mod upload_file;

pub use connect_user::{ConnectUserUseCase, WELCOME_MESSAGE};
pub use create_room::CreateRoomUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use download_file::DownloadFileUseCase;
pub use error::{ConnectError, RoomCommandError, SendMessageError, TransferError};
pub use join_room::JoinRoomUseCase;
pub use list_clients::{ListClientsUseCase, join_names};
pub use quit_room::QuitRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use upload_file::UploadFileUseCase;
