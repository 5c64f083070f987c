//! MessagePusher trait 定義
//!
//! ユースケースがクライアントへメッセージを届けるためのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use parlor_shared::protocol::ChatMessage;
use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::UserName};

/// Outbound handle of one chat session.
///
/// The session's writer task drains the receiving end onto the socket.
pub type PusherChannel = mpsc::UnboundedSender<ChatMessage>;

/// Delivery of messages to connected users, addressed by name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound handle of a session
    async fn register_client(&self, user_name: UserName, sender: PusherChannel);

    /// Drop the outbound handle of a session.
    ///
    /// Only removes the entry if it still belongs to `sender`, so a stale
    /// teardown never detaches a newer session that reused the name.
    async fn unregister_client(&self, user_name: &UserName, sender: &PusherChannel);

    /// Send a message to one user
    async fn push_to(
        &self,
        user_name: &UserName,
        message: ChatMessage,
    ) -> Result<(), MessagePushError>;

    /// Send a message to every target.
    ///
    /// Best effort: a target that cannot be reached is logged and skipped.
    async fn broadcast(&self, targets: Vec<UserName>, message: ChatMessage);
}
