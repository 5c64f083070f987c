//! Fan-out of room events.

use crate::domain::{BroadcastEvent, MessagePusher, UserName, broadcast_targets};

/// Deliver an event to every member except its subject.
///
/// Returns the recipients. Delivery is best effort and never fails.
pub(crate) async fn fan_out(
    message_pusher: &dyn MessagePusher,
    members: Vec<UserName>,
    event: BroadcastEvent,
) -> Vec<UserName> {
    let targets = broadcast_targets(members, event.subject());
    if targets.is_empty() {
        tracing::debug!("No recipients for event about '{}'", event.subject());
        return targets;
    }
    message_pusher
        .broadcast(targets.clone(), event.render())
        .await;
    targets
}
