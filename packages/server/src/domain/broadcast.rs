//! Broadcast payloads and recipient selection.

use parlor_shared::{protocol::ChatMessage, time::format_event_time};

use super::value_object::{Timestamp, UserName};

/// Something that happened in a room and is fanned out to its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    UserJoined { user_name: UserName, at: Timestamp },
    UserLeft { user_name: UserName, at: Timestamp },
    Chat { sender: UserName, message: ChatMessage },
}

impl BroadcastEvent {
    /// The user the event is about; never a recipient of it
    pub fn subject(&self) -> &UserName {
        match self {
            BroadcastEvent::UserJoined { user_name, .. }
            | BroadcastEvent::UserLeft { user_name, .. } => user_name,
            BroadcastEvent::Chat { sender, .. } => sender,
        }
    }

    /// Message delivered to the recipients.
    ///
    /// Join and leave events become server-authored notices stamped with the
    /// time of the event; chat messages are passed through unmodified.
    pub fn render(&self) -> ChatMessage {
        match self {
            BroadcastEvent::UserJoined { user_name, at } => ChatMessage::from_server(format!(
                "{} entered the chat at {}",
                user_name,
                format_event_time(at.value())
            )),
            BroadcastEvent::UserLeft { user_name, at } => ChatMessage::from_server(format!(
                "{} left the chat at {}",
                user_name,
                format_event_time(at.value())
            )),
            BroadcastEvent::Chat { message, .. } => message.clone(),
        }
    }
}

/// Get broadcast targets (all members except the event subject).
pub fn broadcast_targets(members: Vec<UserName>, subject: &UserName) -> Vec<UserName> {
    members
        .into_iter()
        .filter(|member| member != subject)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_shared::protocol::SERVER_NAME;

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_render_user_joined_is_server_notice_with_time() {
        // テスト項目: 参加イベントは時刻付きのサーバー通知になる
        // given (前提条件):
        let at = 1672531200000;
        let event = BroadcastEvent::UserJoined {
            user_name: user("bob"),
            at: Timestamp::new(at),
        };

        // when (操作):
        let message = event.render();

        // then (期待する結果):
        assert_eq!(message.sender_name, SERVER_NAME);
        assert_eq!(
            message.text,
            format!("bob entered the chat at {}", format_event_time(at))
        );
    }

    #[test]
    fn test_render_user_left_is_server_notice_with_time() {
        // テスト項目: 退出イベントは時刻付きのサーバー通知になる
        // given (前提条件):
        let event = BroadcastEvent::UserLeft {
            user_name: user("bob"),
            at: Timestamp::new(0),
        };

        // when (操作):
        let message = event.render();

        // then (期待する結果):
        assert_eq!(message.sender_name, SERVER_NAME);
        assert!(message.text.starts_with("bob left the chat at "));
    }

    #[test]
    fn test_render_chat_is_unmodified() {
        // テスト項目: チャットメッセージはそのまま配信される
        // given (前提条件):
        let original = ChatMessage::new("alice", "hello");
        let event = BroadcastEvent::Chat {
            sender: user("alice"),
            message: original.clone(),
        };

        // when (操作):
        let message = event.render();

        // then (期待する結果):
        assert_eq!(message, original);
        assert_eq!(event.subject(), &user("alice"));
    }

    #[test]
    fn test_broadcast_targets_excludes_subject() {
        // テスト項目: 配信対象からイベントの当事者が除外される
        // given (前提条件):
        let members = vec![user("alice"), user("bob"), user("charlie")];

        // when (操作):
        let targets = broadcast_targets(members, &user("alice"));

        // then (期待する結果):
        assert_eq!(targets, vec![user("bob"), user("charlie")]);
    }

    #[test]
    fn test_broadcast_targets_with_only_subject_is_empty() {
        // テスト項目: 当事者しかいない場合、配信対象は空
        // given (前提条件):
        let members = vec![user("alice")];

        // when (操作):
        let targets = broadcast_targets(members, &user("alice"));

        // then (期待する結果):
        assert!(targets.is_empty());
    }
}
