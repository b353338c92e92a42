use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::event::RoomEvent;
use crate::session::AgentState;

/// Errors reported by a room transport
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomError {
    #[error("Room is disconnected: {0}")]
    Disconnected(String),

    #[error("A text stream handler is already registered for topic: {0}")]
    TopicAlreadyRegistered(String),
}

/// Handle to a real-time room session
///
/// The room is owned by the transport. Listeners receive it as an explicit
/// dependency and only ever read from it, publish data, or disconnect.
#[async_trait]
pub trait Room: Send + Sync {
    fn room_id(&self) -> &str;

    /// Receiver for every event the room delivers from now on
    fn subscribe(&self) -> broadcast::Receiver<RoomEvent>;

    /// Send a payload over the data channel, optionally on a topic
    async fn publish_data(&self, payload: Vec<u8>, topic: Option<&str>) -> Result<(), RoomError>;

    /// Claim a text-stream topic; the claim lasts as long as the registration
    fn register_text_stream_handler(&self, topic: &str) -> Result<TopicRegistration, RoomError>;

    /// Last reported state of the remote agent
    fn agent_state(&self) -> AgentState;

    fn watch_agent_state(&self) -> watch::Receiver<AgentState>;

    async fn disconnect(&self);

    fn is_connected(&self) -> bool;
}

/// Claim on a text-stream topic, released on drop
pub struct TopicRegistration {
    topic: String,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TopicRegistration {
    pub fn new(topic: impl Into<String>, release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            topic: topic.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Debug for TopicRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicRegistration")
            .field("topic", &self.topic)
            .finish()
    }
}

impl Drop for TopicRegistration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
