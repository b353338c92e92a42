use serde::{Deserialize, Serialize};

/// Frames a browser client may send over the view socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessageType {
    Chat,
    #[serde(other)]
    Unsupported,
}

/// Envelope of a client frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub message_type: ClientMessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub content: String,
}

impl ClientMessage {
    /// Create a CHAT frame
    pub fn chat(content: impl Into<String>) -> Self {
        Self {
            message_type: ClientMessageType::Chat,
            payload: serde_json::json!({ "content": content.into() }),
        }
    }
}
