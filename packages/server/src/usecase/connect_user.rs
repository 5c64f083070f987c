//! UseCase: ユーザー接続処理
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::execute() メソッド
//! - ユーザー名の重複チェックと送信チャンネルの登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの接続とウェルカムメッセージ
//! - 異常系：接続中のユーザー名での接続試行

use std::sync::Arc;

use parlor_shared::protocol::ChatMessage;

use crate::domain::{MessagePusher, PusherChannel, RegistryError, RoomRepository, UserName};

use super::error::ConnectError;

/// Sent to every user once their name is accepted
pub const WELCOME_MESSAGE: &str = "You now can join or create a room";

/// ユーザー接続のユースケース
pub struct ConnectUserUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUserUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ユーザー接続を実行
    ///
    /// # Arguments
    ///
    /// * `user_name` - 接続するユーザー名
    /// * `sender` - ユーザーへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 接続成功（ユーザーはルーム未参加の状態）
    /// * `Err(ConnectError)` - 同名のユーザーが接続中
    pub async fn execute(
        &self,
        user_name: UserName,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        // 1. 重複チェックとディレクトリへの登録（1 トランザクション）
        self.repository
            .register_user(user_name.clone())
            .await
            .map_err(|e| match e {
                RegistryError::DuplicateUser(name) => {
                    ConnectError::DuplicateUserName(name.into_string())
                }
                other => ConnectError::Registry(other),
            })?;

        // 2. MessagePusher にチャンネルを登録
        self.message_pusher
            .register_client(user_name.clone(), sender)
            .await;

        // 3. ウェルカムメッセージ
        if let Err(e) = self
            .message_pusher
            .push_to(&user_name, ChatMessage::from_server(WELCOME_MESSAGE))
            .await
        {
            tracing::warn!("Failed to welcome '{}': {}", user_name, e);
        }

        Ok(())
    }
}
