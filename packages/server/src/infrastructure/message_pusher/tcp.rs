//! TCP セッション向けの MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの `PusherChannel`（送信側）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層のセッションごとの writer タスクが行います。
//! この実装はチャンネルへ送るだけなので、遅いクライアントが他のクライアントへの
//! 配信をブロックすることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parlor_shared::protocol::ChatMessage;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserName};

/// Channel-backed MessagePusher for TCP chat sessions
pub struct TcpMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: user name
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<UserName, PusherChannel>>>,
}

impl TcpMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<UserName, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for TcpMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for TcpMessagePusher {
    async fn register_client(&self, user_name: UserName, sender: PusherChannel) {
        tracing::debug!("Client '{}' registered to MessagePusher", user_name);
        self.clients.lock().await.insert(user_name, sender);
    }

    async fn unregister_client(&self, user_name: &UserName, sender: &PusherChannel) {
        let mut clients = self.clients.lock().await;
        if clients
            .get(user_name)
            .is_some_and(|registered| registered.same_channel(sender))
        {
            clients.remove(user_name);
            tracing::debug!("Client '{}' unregistered from MessagePusher", user_name);
        }
    }

    async fn push_to(
        &self,
        user_name: &UserName,
        message: ChatMessage,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(user_name) else {
            return Err(MessagePushError::ClientNotFound(user_name.to_string()));
        };
        sender
            .send(message)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", user_name);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<UserName>, message: ChatMessage) {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // ブロードキャストでは一部の送信失敗を許容
                    if let Err(e) = sender.send(message.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    } else {
                        tracing::debug!("Broadcasted message to client '{}'", target);
                    }
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信と部分失敗の許容
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（クライアントが存在しない）
    // 3. broadcast の成功ケース（複数クライアント）
    // 4. broadcast の部分失敗ケース（切断済み・未登録のクライアント）
    // ========================================

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにメッセージを送信できる
        // given (前提条件):
        let pusher = TcpMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(user("alice"), tx).await;

        // when (操作):
        let result = pusher
            .push_to(&user("alice"), ChatMessage::from_server("Hello"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(ChatMessage::from_server("Hello")));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let pusher = TcpMessagePusher::default();

        // when (操作):
        let result = pusher
            .push_to(&user("nonexistent"), ChatMessage::from_server("Hello"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nonexistent".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_unregistered_client_fails() {
        // テスト項目: 登録解除後のクライアントには送信できない
        // given (前提条件):
        let pusher = TcpMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(user("alice"), tx.clone()).await;
        pusher.unregister_client(&user("alice"), &tx).await;

        // when (操作):
        let result = pusher
            .push_to(&user("alice"), ChatMessage::from_server("Hello"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_with_stale_channel_keeps_newer_session() {
        // テスト項目: 古いセッションの登録解除は同名の新しいセッションを外さない
        // given (前提条件):
        let pusher = TcpMessagePusher::default();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        pusher.register_client(user("alice"), old_tx.clone()).await;
        pusher.register_client(user("alice"), new_tx).await;

        // when (操作):
        pusher.unregister_client(&user("alice"), &old_tx).await;

        // then (期待する結果):
        pusher
            .push_to(&user("alice"), ChatMessage::from_server("still here"))
            .await
            .unwrap();
        assert_eq!(
            new_rx.recv().await,
            Some(ChatMessage::from_server("still here"))
        );
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のクライアントにメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = TcpMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(user("alice"), tx1).await;
        pusher.register_client(user("bob"), tx2).await;
        let message = ChatMessage::new("carol", "Broadcast message");

        // when (操作):
        pusher
            .broadcast(vec![user("alice"), user("bob")], message.clone())
            .await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some(message.clone()));
        assert_eq!(rx2.recv().await, Some(message));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のクライアントが切断済み・未登録でも他のクライアントには届く
        // given (前提条件):
        let pusher = TcpMessagePusher::default();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        pusher.register_client(user("alice"), tx_closed).await;
        pusher.register_client(user("bob"), tx_bob).await;
        drop(rx_closed);
        let message = ChatMessage::new("carol", "still delivered");

        // when (操作):
        pusher
            .broadcast(
                vec![user("alice"), user("nonexistent"), user("bob")],
                message.clone(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(rx_bob.recv().await, Some(message));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでも問題なく完了する
        // given (前提条件):
        let pusher = TcpMessagePusher::default();

        // when (操作):
        pusher
            .broadcast(vec![], ChatMessage::from_server("Message"))
            .await;

        // then (期待する結果):
        // パニックしなければ成功
    }
}
