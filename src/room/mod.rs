// Room transport boundary and the HTTP bridge that feeds the in-process rooms

// Public API - what other modules can use
pub use connection::{Room, RoomError, TopicRegistration};
pub use handlers::{
    ingest_chat, ingest_data, ingest_text_stream, ingest_transcription, update_agent_state,
    DATA_TOPIC_HEADER, PARTICIPANT_HEADER,
};
pub use local::{LocalRoom, PublishedData};
pub use registry::RoomRegistry;
pub use types::BridgeAck;

// Internal modules
mod connection;
mod handlers;
mod local;
mod registry;
mod types;
