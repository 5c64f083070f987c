//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者以外のルームメンバーへのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト（内容は変更されない）
//! - 異常系：ルーム未参加での送信（何も起きない）
//! - エッジケース：送信者のみがルームにいる場合（ブロードキャスト対象なし）

use std::sync::Arc;

use parlor_shared::protocol::ChatMessage;

use crate::domain::{BroadcastEvent, MessagePusher, RoomRepository, UserName};

use super::{broadcast::fan_out, error::SendMessageError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者のユーザー名（セッションのユーザー）
    /// * `message` - 受信したメッセージ（そのまま転送される）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - ブロードキャスト対象のユーザー
    /// * `Err(SendMessageError)` - 送信者がルームに参加していない
    pub async fn execute(
        &self,
        sender: &UserName,
        message: ChatMessage,
    ) -> Result<Vec<UserName>, SendMessageError> {
        // 1. 送信者のルームとメンバーを取得（ロック内で確定）
        let Some((room_name, members)) = self.repository.peers_of(sender).await else {
            return Err(SendMessageError::NotInRoom);
        };

        // 2. 送信者以外にブロードキャスト
        tracing::debug!("'{}' sends a message to room '{}'", sender, room_name);
        let event = BroadcastEvent::Chat {
            sender: sender.clone(),
            message,
        };
        Ok(fan_out(self.message_pusher.as_ref(), members, event).await)
    }
}
