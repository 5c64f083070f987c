//! UseCase: 接続中のユーザー一覧

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository, UserName};

/// `/clients` と `/clients <room>` の問い合わせ
pub struct ListClientsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl ListClientsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// All connected users, sorted
    pub async fn all(&self) -> Vec<UserName> {
        self.repository.user_names().await
    }

    /// Members of a room, sorted; empty for an unknown room
    pub async fn in_room(&self, room_name: &RoomName) -> Vec<UserName> {
        self.repository.members_of(room_name).await
    }
}

/// Comma-separated list used in chat replies
pub fn join_names(names: &[UserName]) -> String {
    names
        .iter()
        .map(UserName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
