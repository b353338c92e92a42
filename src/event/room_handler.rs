use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Errors that can occur when handling room events
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that react to room events
///
/// A handler is attached to exactly one room through a
/// [`RoomSubscription`](super::RoomSubscription) and sees every event that
/// room delivers. Handlers pick out the variants they care about and treat
/// the rest as a no-op.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    /// Handle a room event
    ///
    /// Returning an error only logs it; the subscription keeps running.
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
