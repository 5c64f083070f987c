//! UseCase: ルーム参加処理
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加通知が要求者以外のメンバーにだけ届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存のルームへの参加
//! - 異常系：存在しないルーム、既に別のルームに参加している

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{BroadcastEvent, MessagePusher, RoomName, RoomRepository, Timestamp, UserName};

use super::{broadcast::fan_out, error::RoomCommandError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - 参加通知を受け取ったメンバー
    /// * `Err(RoomCommandError)` - 参加できなかった（状態は変わらない）
    pub async fn execute(
        &self,
        user_name: &UserName,
        room_name: &RoomName,
    ) -> Result<Vec<UserName>, RoomCommandError> {
        let others = self.repository.join_room(user_name, room_name).await?;
        tracing::info!("'{}' joined room '{}'", user_name, room_name);

        let event = BroadcastEvent::UserJoined {
            user_name: user_name.clone(),
            at: Timestamp::new(self.clock.now_millis()),
        };
        Ok(fan_out(self.message_pusher.as_ref(), others, event).await)
    }
}
