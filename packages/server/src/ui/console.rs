//! Server console: room commands typed on stdin.
//!
//! Only the read-only commands do something here; the console is not a chat
//! user and cannot create, join or quit rooms.

use std::{io::BufRead, sync::Arc};

use tokio::sync::mpsc;

use crate::domain::RoomCommand;

use super::state::AppState;

pub const USER_ONLY_MESSAGE: &str = "Command is only available to chat users";
pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command";

/// Start reading stdin on a dedicated thread and answer each line.
///
/// Blocking stdin reads stay off the runtime so they never hold up shutdown.
pub fn spawn(state: Arc<AppState>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Console input error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            for output in evaluate(&state, &line).await {
                println!("{}", output);
            }
        }
        tracing::debug!("Console input closed");
    });
}

/// Lines printed in response to one console command
pub async fn evaluate(state: &AppState, line: &str) -> Vec<String> {
    if line.trim().is_empty() {
        return vec![];
    }
    match RoomCommand::parse(line) {
        RoomCommand::ListAllClients => names(state.list_clients_usecase.all().await),
        RoomCommand::ListClientsInRoom(room_name) => {
            names(state.list_clients_usecase.in_room(&room_name).await)
        }
        RoomCommand::CreateRoom(_)
        | RoomCommand::JoinRoom(_)
        | RoomCommand::QuitRoom
        | RoomCommand::PublishFile(_)
        | RoomCommand::DownloadFile(_) => vec![USER_ONLY_MESSAGE.to_string()],
        RoomCommand::Unknown => vec![UNKNOWN_COMMAND_MESSAGE.to_string()],
    }
}

fn names(users: Vec<crate::domain::UserName>) -> Vec<String> {
    users.into_iter().map(|user| user.into_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomName, RoomRepository, UserName},
        infrastructure::{
            file_store::FileStore, message_pusher::TcpMessagePusher,
            repository::InMemoryRoomRepository,
        },
    };
    use parlor_shared::time::SystemClock;

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    async fn state_with_lobby() -> AppState {
        let repository = Arc::new(InMemoryRoomRepository::default());
        for name in ["bob", "alice", "carol"] {
            repository.register_user(user(name)).await.unwrap();
        }
        let lobby = RoomName::new("lobby".to_string()).unwrap();
        repository.create_room(&user("bob"), lobby.clone()).await.unwrap();
        repository.join_room(&user("alice"), &lobby).await.unwrap();
        AppState::new(
            repository,
            Arc::new(TcpMessagePusher::default()),
            Arc::new(SystemClock),
            Arc::new(FileStore::new("unused")),
        )
    }

    #[tokio::test]
    async fn test_console_lists_clients() {
        // テスト項目: /clients は全ユーザー、/clients <room> はメンバーを 1 行ずつ出力する
        // given (前提条件):
        let state = state_with_lobby().await;

        // when (操作):
        let all = evaluate(&state, "/clients").await;
        let in_lobby = evaluate(&state, "/clients lobby").await;
        let in_unknown = evaluate(&state, "/clients nowhere").await;

        // then (期待する結果):
        assert_eq!(all, vec!["alice", "bob", "carol"]);
        assert_eq!(in_lobby, vec!["alice", "bob"]);
        assert!(in_unknown.is_empty());
    }

    #[tokio::test]
    async fn test_console_rejects_user_commands_and_unknown_input() {
        // テスト項目: ルームを変更するコマンドと未知の入力にはメッセージを返す
        // given (前提条件):
        let state = state_with_lobby().await;

        // when (操作):
        let create = evaluate(&state, "/create office").await;
        let quit = evaluate(&state, "/quit").await;
        let unknown = evaluate(&state, "hello").await;
        let blank = evaluate(&state, "   ").await;

        // then (期待する結果):
        assert_eq!(create, vec![USER_ONLY_MESSAGE]);
        assert_eq!(quit, vec![USER_ONLY_MESSAGE]);
        assert_eq!(unknown, vec![UNKNOWN_COMMAND_MESSAGE]);
        assert!(blank.is_empty());
    }
}
