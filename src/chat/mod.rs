// Public API - what other modules can use
pub use aggregator::{ChatAggregator, RoomChatAggregator, CHAT_TOPIC};
pub use models::{ChatMessage, ChatPacket, ChatRole, TranscriptionSegment};
pub use sender::{OutboundSender, SendError, SendState};

// Internal modules
mod aggregator;
mod models;
mod sender;
