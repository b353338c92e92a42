use crate::chat::{ChatMessage, TranscriptionSegment};

/// Events delivered by a room transport
///
/// Events represent facts the room has already observed. They reach
/// listeners in the order the transport delivered them.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A data-channel packet arrived
    DataReceived {
        payload: Vec<u8>,
        participant: Option<String>,
        topic: Option<String>,
    },

    /// A text stream on a named topic completed
    TextStreamReceived {
        topic: String,
        text: String,
        participant: Option<String>,
    },

    /// A chat message sent by another participant
    ChatReceived { message: ChatMessage },

    /// A live transcription segment, interim or final
    TranscriptionReceived { segment: TranscriptionSegment },

    /// The room connection was closed
    Disconnected,
}

impl RoomEvent {
    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::DataReceived { .. } => "data_received",
            RoomEvent::TextStreamReceived { .. } => "text_stream_received",
            RoomEvent::ChatReceived { .. } => "chat_received",
            RoomEvent::TranscriptionReceived { .. } => "transcription_received",
            RoomEvent::Disconnected => "disconnected",
        }
    }
}
