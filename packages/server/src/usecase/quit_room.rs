//! UseCase: ルーム退出処理

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{BroadcastEvent, Departure, MessagePusher, RoomRepository, Timestamp, UserName};

use super::{broadcast::fan_out, error::RoomCommandError};

/// ルーム退出のユースケース
///
/// ルームは空になっても削除されません。
pub struct QuitRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl QuitRoomUseCase {
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

    pub async fn execute(&self, user_name: &UserName) -> Result<Departure, RoomCommandError> {
        let departure = self.repository.quit_room(user_name).await?;
        tracing::info!("'{}' quit room '{}'", user_name, departure.room);

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
        Ok(departure)
    }
}
