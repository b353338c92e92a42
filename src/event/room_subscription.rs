use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::room_handler::RoomEventHandler;
use crate::room::Room;

/// Routes the events of one room to one handler
pub struct RoomSubscription {
    room: Arc<dyn Room>,
    handler: Arc<dyn RoomEventHandler>,
}

impl RoomSubscription {
    pub fn new(room: Arc<dyn Room>, handler: Arc<dyn RoomEventHandler>) -> Self {
        Self { room, handler }
    }

    /// Start the subscription
    ///
    /// The room receiver is acquired before this returns, so every event
    /// emitted afterwards reaches the handler. The returned guard is the
    /// disposer: dropping it stops the routing task, including a handler
    /// call that is still in flight.
    pub fn start(self) -> SubscriptionGuard {
        let room_id = self.room.room_id().to_string();
        let handler_name = self.handler.handler_name();

        info!(
            room_id = %room_id,
            handler = handler_name,
            "Starting room subscription"
        );

        let mut receiver = self.room.subscribe();
        let handler = self.handler;
        let task_room_id = room_id.clone();

        let handle = tokio::spawn(async move {
            let room_id = task_room_id;

            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            room_id = %room_id,
                            handler = handler_name,
                            skipped = skipped,
                            "Room subscription lagged, events dropped"
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                debug!(
                    room_id = %room_id,
                    handler = handler_name,
                    event_type = event.event_type(),
                    "Received room event"
                );

                if let Err(e) = handler.handle_room_event(&room_id, event).await {
                    warn!(
                        room_id = %room_id,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            debug!(
                room_id = %room_id,
                handler = handler_name,
                "Room subscription ended - no more events"
            );
        });

        SubscriptionGuard {
            room_id,
            handler_name,
            handle,
        }
    }
}

/// Owns a running subscription; releasing it detaches the handler
#[derive(Debug)]
pub struct SubscriptionGuard {
    room_id: String,
    handler_name: &'static str,
    handle: JoinHandle<()>,
}

impl SubscriptionGuard {
    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Explicit release, same as dropping the guard
    pub fn unsubscribe(self) {}
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(
            room_id = %self.room_id,
            handler = self.handler_name,
            "Room subscription released"
        );
    }
}
