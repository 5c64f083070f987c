//! UseCase: ルーム作成処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム未参加のユーザーが新しいルームを作成（作成者が最初のメンバー）
//! - 異常系：同名のルームが既に存在する（状態は変わらない）
//! - 異常系：既に別のルームに参加している

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository, UserName};

use super::error::RoomCommandError;

/// ルーム作成のユースケース
///
/// 作成は要求者にだけ返信され、ブロードキャストは行いません。
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        user_name: &UserName,
        room_name: RoomName,
    ) -> Result<(), RoomCommandError> {
        self.repository
            .create_room(user_name, room_name.clone())
            .await?;
        tracing::info!("'{}' created room '{}'", user_name, room_name);
        Ok(())
    }
}
