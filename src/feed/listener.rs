use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::messages::{decode_data_message, DataMessage, KnowledgeMessage};
use super::store::KnowledgeFeed;
use crate::event::{RoomEvent, RoomEventError, RoomEventHandler};
use crate::session::{ViewUpdate, ViewUpdates};

/// Turns `knowledgeTransfer` data packets into feed entries
///
/// Malformed packets and other message types are logged and dropped; the
/// sender never hears back either way.
pub struct KnowledgeFeedListener {
    feed: Arc<KnowledgeFeed>,
    updates: ViewUpdates,
}

impl KnowledgeFeedListener {
    pub fn new(feed: Arc<KnowledgeFeed>, updates: ViewUpdates) -> Self {
        Self { feed, updates }
    }

    async fn handle_data(&self, room_id: &str, payload: &[u8], participant: Option<String>) {
        match decode_data_message(payload) {
            Ok(DataMessage::KnowledgeTransfer(knowledge)) => {
                let received_at = chrono::Utc::now().timestamp_millis();
                let message = KnowledgeMessage::from_payload(knowledge, participant, received_at);
                let message = self.feed.append(message).await;

                info!(
                    room_id = %room_id,
                    from = ?message.from,
                    ts = message.ts,
                    "Knowledge message appended to feed"
                );
                self.updates.publish(ViewUpdate::FeedAppended { message });
            }
            Ok(DataMessage::Unknown) => {
                debug!(room_id = %room_id, "Ignoring data packet with unrecognised type");
            }
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "Invalid data packet");
            }
        }
    }
}

#[async_trait]
impl RoomEventHandler for KnowledgeFeedListener {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        if let RoomEvent::DataReceived {
            payload,
            participant,
            ..
        } = event
        {
            self.handle_data(room_id, &payload, participant).await;
        }
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "KnowledgeFeedListener"
    }
}
