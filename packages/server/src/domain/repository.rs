//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 つのトランザクションとして実行され、ディレクトリと
//! ルームメンバーの整合性を保ちます。

use async_trait::async_trait;

use super::{
    error::RegistryError,
    registry::Departure,
    value_object::{FileName, RoomName, UserName},
};

/// Room Repository trait
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Register a newly connected user (no room)
    async fn register_user(&self, user_name: UserName) -> Result<(), RegistryError>;

    /// Remove a user; returns the departure if they were in a room
    async fn unregister_user(
        &self,
        user_name: &UserName,
    ) -> Result<Option<Departure>, RegistryError>;

    /// Create a room with the requester as its first member
    async fn create_room(
        &self,
        user_name: &UserName,
        room_name: RoomName,
    ) -> Result<(), RegistryError>;

    /// Join an existing room; returns the other members
    async fn join_room(
        &self,
        user_name: &UserName,
        room_name: &RoomName,
    ) -> Result<Vec<UserName>, RegistryError>;

    /// Leave the current room
    async fn quit_room(&self, user_name: &UserName) -> Result<Departure, RegistryError>;

    /// Current room of a user
    async fn room_of(&self, user_name: &UserName) -> Result<Option<RoomName>, RegistryError>;

    /// The user's room and its other members
    async fn peers_of(&self, user_name: &UserName) -> Option<(RoomName, Vec<UserName>)>;

    /// Members of a room (empty for an unknown room)
    async fn members_of(&self, room_name: &RoomName) -> Vec<UserName>;

    /// All connected users
    async fn user_names(&self) -> Vec<UserName>;

    /// Record a finished upload in a room
    async fn register_upload(
        &self,
        room_name: &RoomName,
        file_name: FileName,
    ) -> Result<(), RegistryError>;

    /// Whether a file was uploaded to a room
    async fn has_file(&self, room_name: &RoomName, file_name: &FileName) -> bool;
}
