//! Room-command grammar.
//!
//! Applied to every chat line a session receives and to every line typed on
//! the server console. The first whitespace-delimited token selects the
//! command; extra arguments are ignored.

use super::value_object::RoomName;

pub const CLIENTS: &str = "/clients";
pub const CREATE: &str = "/create";
pub const JOIN: &str = "/join";
pub const QUIT: &str = "/quit";
pub const PUBLISH: &str = "/publish";
pub const DOWNLOAD: &str = "/download";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    /// `/clients`
    ListAllClients,
    /// `/clients <room>`
    ListClientsInRoom(RoomName),
    /// `/create <room>`
    CreateRoom(RoomName),
    /// `/join <room>`
    JoinRoom(RoomName),
    /// `/quit`
    QuitRoom,
    /// `/publish <path>`
    PublishFile(String),
    /// `/download <path>`
    DownloadFile(String),
    /// Anything else, including a command missing its argument
    Unknown,
}

impl RoomCommand {
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return RoomCommand::Unknown;
        };
        let argument = tokens.next();

        match (command, argument) {
            (CLIENTS, None) => RoomCommand::ListAllClients,
            (CLIENTS, Some(room)) => Self::with_room(room, RoomCommand::ListClientsInRoom),
            (CREATE, Some(room)) => Self::with_room(room, RoomCommand::CreateRoom),
            (JOIN, Some(room)) => Self::with_room(room, RoomCommand::JoinRoom),
            (QUIT, _) => RoomCommand::QuitRoom,
            (PUBLISH, Some(path)) => RoomCommand::PublishFile(path.to_string()),
            (DOWNLOAD, Some(path)) => RoomCommand::DownloadFile(path.to_string()),
            _ => RoomCommand::Unknown,
        }
    }

    fn with_room(room: &str, command: fn(RoomName) -> RoomCommand) -> Self {
        RoomName::new(room.to_string())
            .map(command)
            .unwrap_or(RoomCommand::Unknown)
    }
}
