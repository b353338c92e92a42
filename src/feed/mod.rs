// Knowledge transfer feed: data-channel packets in, ordered feed entries out

// Public API - what other modules can use
pub use listener::KnowledgeFeedListener;
pub use messages::{
    decode_data_message, DataMessage, DecodeError, ExtraData, KnowledgeMessage, KnowledgePayload,
};
pub use store::KnowledgeFeed;

// Internal modules
mod listener;
mod messages;
mod store;
