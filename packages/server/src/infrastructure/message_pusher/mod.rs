//! メッセージ送信（通知）の実装
//!
//! - `tcp`: セッションごとの送信チャンネルを使った実装

pub mod tcp;

pub use tcp::TcpMessagePusher;
