//! Domain layer: entities, value objects, the room registry and the
//! interfaces the use cases depend on.

pub mod broadcast;
pub mod command;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use broadcast::{BroadcastEvent, broadcast_targets};
pub use command::RoomCommand;
pub use entity::Room;
pub use error::{MessagePushError, RegistryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use registry::{Departure, RoomRegistry};
pub use repository::RoomRepository;
pub use value_object::{FileName, RoomName, Timestamp, UserName};
