use serde::{Deserialize, Serialize};

/// Who produced a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the merged chat and transcription list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// A piece of live transcription; interim segments are later replaced by
/// a final one carrying the same id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    pub id: String,
    pub text: String,
    pub first_received_time: i64,
    #[serde(default)]
    pub is_final: bool,
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl From<TranscriptionSegment> for ChatMessage {
    fn from(segment: TranscriptionSegment) -> Self {
        Self {
            id: segment.id,
            text: segment.text,
            timestamp: segment.first_received_time,
            role: segment.role,
            from: segment.from,
        }
    }
}

/// Wire shape of a chat packet on the data channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPacket {
    pub id: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<&ChatMessage> for ChatPacket {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            message: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}
