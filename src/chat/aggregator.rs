use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{ChatMessage, ChatPacket, ChatRole};
use super::sender::SendError;
use crate::event::{RoomEvent, RoomEventError, RoomEventHandler};
use crate::room::Room;
use crate::session::{ViewUpdate, ViewUpdates};

/// Data-channel topic chat packets travel on
pub const CHAT_TOPIC: &str = "lk-chat-topic";

/// Source of the chat list shown next to the meeting
#[async_trait]
pub trait ChatAggregator: Send + Sync {
    /// Current list, ordered by timestamp
    async fn messages(&self) -> Vec<ChatMessage>;

    /// Send a chat line through the room and record it locally
    async fn send(&self, text: &str) -> Result<ChatMessage, SendError>;
}

/// Merges received chat and live transcription of one room
pub struct RoomChatAggregator {
    room: Arc<dyn Room>,
    messages: RwLock<Vec<ChatMessage>>,
    updates: ViewUpdates,
}

impl RoomChatAggregator {
    pub fn new(room: Arc<dyn Room>, updates: ViewUpdates) -> Self {
        Self {
            room,
            messages: RwLock::new(Vec::new()),
            updates,
        }
    }

    async fn record(&self, message: ChatMessage) {
        {
            let mut messages = self.messages.write().await;
            merge_message(&mut messages, message.clone());
        }
        self.updates.publish(ViewUpdate::ChatUpdated { message });
    }
}

/// Inserts by timestamp; an entry with a known id only has its text replaced
fn merge_message(messages: &mut Vec<ChatMessage>, message: ChatMessage) {
    if let Some(existing) = messages.iter_mut().find(|m| m.id == message.id) {
        existing.text = message.text;
        return;
    }

    let position = messages.partition_point(|m| m.timestamp <= message.timestamp);
    messages.insert(position, message);
}

#[async_trait]
impl ChatAggregator for RoomChatAggregator {
    async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    async fn send(&self, text: &str) -> Result<ChatMessage, SendError> {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            role: ChatRole::User,
            from: None,
        };

        let payload = serde_json::to_vec(&ChatPacket::from(&message))
            .map_err(|e| SendError::Encode(e.to_string()))?;
        self.room.publish_data(payload, Some(CHAT_TOPIC)).await?;

        info!(
            room_id = %self.room.room_id(),
            message_id = %message.id,
            "Chat message sent"
        );

        self.record(message.clone()).await;
        Ok(message)
    }
}

#[async_trait]
impl RoomEventHandler for RoomChatAggregator {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        match event {
            RoomEvent::ChatReceived { message } => {
                debug!(room_id = %room_id, message_id = %message.id, "Chat message received");
                self.record(message).await;
            }
            RoomEvent::TranscriptionReceived { segment } => {
                debug!(
                    room_id = %room_id,
                    segment_id = %segment.id,
                    is_final = segment.is_final,
                    "Transcription segment received"
                );
                self.record(segment.into()).await;
            }
            RoomEvent::DataReceived { .. }
            | RoomEvent::TextStreamReceived { .. }
            | RoomEvent::Disconnected => {}
        }
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "RoomChatAggregator"
    }
}
