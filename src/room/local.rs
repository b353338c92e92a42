use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::connection::{Room, RoomError, TopicRegistration};
use crate::event::RoomEvent;
use crate::session::AgentState;

const ROOM_CAPACITY: usize = 100;

/// A data-channel packet this side sent into the room
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedData {
    pub payload: Vec<u8>,
    pub topic: Option<String>,
}

/// In-process room transport
///
/// Events are injected with [`LocalRoom::emit`] (by the ingestion bridge or
/// by tests) and fanned out to every subscriber. Data published by listeners
/// is fanned out on a separate channel.
#[derive(Debug)]
pub struct LocalRoom {
    room_id: String,
    events: broadcast::Sender<RoomEvent>,
    published: broadcast::Sender<PublishedData>,
    agent_state: watch::Sender<AgentState>,
    topics: Arc<Mutex<HashSet<String>>>,
    connected: AtomicBool,
    disconnect_calls: AtomicUsize,
}

impl LocalRoom {
    pub fn new(room_id: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(ROOM_CAPACITY);
        let (published, _) = broadcast::channel(ROOM_CAPACITY);
        let (agent_state, _) = watch::channel(AgentState::Connecting);

        Self {
            room_id: room_id.into(),
            events,
            published,
            agent_state,
            topics: Arc::new(Mutex::new(HashSet::new())),
            connected: AtomicBool::new(true),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    /// Delivers an event to all current subscribers, returning how many saw it
    pub fn emit(&self, event: RoomEvent) -> usize {
        let event_type = event.event_type();
        match self.events.send(event) {
            Ok(receivers) => {
                debug!(
                    room_id = %self.room_id,
                    event_type = event_type,
                    receivers = receivers,
                    "Room event emitted"
                );
                receivers
            }
            Err(_) => {
                debug!(
                    room_id = %self.room_id,
                    event_type = event_type,
                    "Room event emitted with no receivers"
                );
                0
            }
        }
    }

    /// Records a new agent state; watchers are only woken on an actual change
    pub fn set_agent_state(&self, state: AgentState) {
        let changed = self.agent_state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });

        if changed {
            info!(room_id = %self.room_id, state = %state, "Agent state changed");
        }
    }

    pub fn subscribe_published(&self) -> broadcast::Receiver<PublishedData> {
        self.published.subscribe()
    }

    /// How many times `disconnect` has been called on this room
    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn registered_topics(&self) -> Vec<String> {
        let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics.iter().cloned().collect()
    }
}

#[async_trait]
impl Room for LocalRoom {
    fn room_id(&self) -> &str {
        &self.room_id
    }

    fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    async fn publish_data(&self, payload: Vec<u8>, topic: Option<&str>) -> Result<(), RoomError> {
        if !self.is_connected() {
            return Err(RoomError::Disconnected(self.room_id.clone()));
        }

        debug!(
            room_id = %self.room_id,
            bytes = payload.len(),
            topic = ?topic,
            "Publishing data"
        );

        // Nobody listening on the outbound side is not a failure
        let _ = self.published.send(PublishedData {
            payload,
            topic: topic.map(str::to_string),
        });
        Ok(())
    }

    fn register_text_stream_handler(&self, topic: &str) -> Result<TopicRegistration, RoomError> {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        if !topics.insert(topic.to_string()) {
            return Err(RoomError::TopicAlreadyRegistered(topic.to_string()));
        }

        debug!(room_id = %self.room_id, topic = %topic, "Text stream handler registered");

        let topics = Arc::clone(&self.topics);
        let released = topic.to_string();
        Ok(TopicRegistration::new(topic, move || {
            topics
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&released);
        }))
    }

    fn agent_state(&self) -> AgentState {
        *self.agent_state.borrow()
    }

    fn watch_agent_state(&self) -> watch::Receiver<AgentState> {
        self.agent_state.subscribe()
    }

    async fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);

        if self.connected.swap(false, Ordering::SeqCst) {
            info!(room_id = %self.room_id, "Room disconnected");
            self.emit(RoomEvent::Disconnected);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_topic_can_only_be_registered_once() {
        let room = LocalRoom::new("r1");

        let registration = room.register_text_stream_handler("presentation").unwrap();
        assert_eq!(registration.topic(), "presentation");

        let second = room.register_text_stream_handler("presentation");
        assert_eq!(
            second.unwrap_err(),
            RoomError::TopicAlreadyRegistered("presentation".to_string())
        );
    }

    #[tokio::test]
    async fn test_dropping_registration_releases_topic() {
        let room = LocalRoom::new("r1");

        let registration = room.register_text_stream_handler("presentation").unwrap();
        drop(registration);

        assert!(room.registered_topics().is_empty());
        assert!(room.register_text_stream_handler("presentation").is_ok());
    }

    #[tokio::test]
    async fn test_publish_fails_after_disconnect() {
        let room = LocalRoom::new("r1");
        let mut published = room.subscribe_published();

        room.publish_data(b"hello".to_vec(), Some("lk-chat-topic"))
            .await
            .unwrap();
        let sent = published.recv().await.unwrap();
        assert_eq!(sent.payload, b"hello".to_vec());
        assert_eq!(sent.topic.as_deref(), Some("lk-chat-topic"));

        room.disconnect().await;
        let result = room.publish_data(b"again".to_vec(), None).await;
        assert_eq!(result.unwrap_err(), RoomError::Disconnected("r1".to_string()));
    }

    #[tokio::test]
    async fn test_disconnect_emits_event_once() {
        let room = LocalRoom::new("r1");
        let mut events = room.subscribe();

        room.disconnect().await;
        room.disconnect().await;

        assert!(matches!(events.recv().await.unwrap(), RoomEvent::Disconnected));
        assert!(events.try_recv().is_err());
        assert_eq!(room.disconnect_calls(), 2);
        assert!(!room.is_connected());
    }

    #[tokio::test]
    async fn test_agent_state_watch_skips_repeated_states() {
        let room = LocalRoom::new("r1");
        let mut watcher = room.watch_agent_state();
        assert_eq!(room.agent_state(), AgentState::Connecting);

        room.set_agent_state(AgentState::Connecting);
        assert!(!watcher.has_changed().unwrap());

        room.set_agent_state(AgentState::Listening);
        assert!(watcher.has_changed().unwrap());
        assert_eq!(*watcher.borrow_and_update(), AgentState::Listening);
    }
}
