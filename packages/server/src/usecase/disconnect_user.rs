//! UseCase: ユーザー切断処理
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//! - ディレクトリからの削除、ルームからの退出通知、チャンネルの登録解除
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加中のユーザーの切断（退出通知あり）
//! - 正常系：ルーム未参加のユーザーの切断（通知なし）
//! - エッジケース：同じユーザーの 2 回目の切断（何もしない）

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    BroadcastEvent, Departure, MessagePusher, PusherChannel, RoomRepository, Timestamp, UserName,
};

use super::broadcast::fan_out;

/// ユーザー切断のユースケース
pub struct DisconnectUserUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectUserUseCase {
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

    /// ユーザー切断を実行
    ///
    /// # Arguments
    ///
    /// * `user_name` - 切断するユーザー名
    /// * `sender` - そのセッションの送信チャンネル（登録解除に使用）
    ///
    /// # Returns
    ///
    /// ユーザーがルームに参加していた場合はその退出情報。既に切断済みの場合は
    /// 何もせず `None` を返す。
    pub async fn execute(&self, user_name: &UserName, sender: &PusherChannel) -> Option<Departure> {
        // 1. ディレクトリとルームから削除（1 トランザクション）
        let departure = match self.repository.unregister_user(user_name).await {
            Ok(departure) => departure,
            Err(e) => {
                tracing::debug!("Skipping teardown of '{}': {}", user_name, e);
                return None;
            }
        };

        // 2. ルームの残りのメンバーに退出を通知
        if let Some(departure) = &departure {
            let event = BroadcastEvent::UserLeft {
                user_name: user_name.clone(),
                at: Timestamp::new(self.clock.now_millis()),
            };
            fan_out(
                self.message_pusher.as_ref(),
                departure.remaining.clone(),
                event,
            )
            .await;
            tracing::info!("'{}' left room '{}' on disconnect", user_name, departure.room);
        }

        // 3. MessagePusher からチャンネルを登録解除
        self.message_pusher
            .unregister_client(user_name, sender)
            .await;

        departure
    }
}
