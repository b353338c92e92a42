use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use super::agent::AgentState;
use super::updates::ViewUpdates;
use super::watchdog::{AvailabilityWatchdog, WatchdogHandle, AGENT_READY_TIMEOUT};
use crate::chat::{
    ChatAggregator, ChatMessage, OutboundSender, RoomChatAggregator, SendError, SendState,
};
use crate::config::AppConfig;
use crate::event::{RoomSubscription, SubscriptionGuard};
use crate::feed::{KnowledgeFeed, KnowledgeFeedListener, KnowledgeMessage};
use crate::notify::Notifier;
use crate::presentation::{PresentationAttachment, PresentationRenderer, SlideContent};
use crate::room::Room;

/// Settings a session view is mounted with
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub presentation_topic: String,
    pub agent_ready_timeout: Duration,
    /// Maximum feed length; `None` keeps every entry for the whole session
    pub feed_capacity: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            presentation_topic: "presentation".to_string(),
            agent_ready_timeout: AGENT_READY_TIMEOUT,
            feed_capacity: None,
        }
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            presentation_topic: config.presentation_topic.clone(),
            agent_ready_timeout: config.agent_ready_timeout,
            feed_capacity: config.feed_capacity,
        }
    }
}

/// Everything a client needs to draw the view from scratch
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub room_id: String,
    pub connected: bool,
    pub agent_state: AgentState,
    pub session_started: bool,
    pub feed: Vec<KnowledgeMessage>,
    pub slide: SlideContent,
    pub chat: Vec<ChatMessage>,
    pub send_state: SendState,
}

/// The meeting-room view of one room
///
/// Mounting attaches every listener to the room. Unmounting, or dropping
/// the view, releases all of them together with the topic claim and the
/// availability timer. An unmounted view sends nothing more to the room.
pub struct SessionView {
    room: Arc<dyn Room>,
    options: SessionOptions,
    updates: ViewUpdates,
    notifier: Arc<dyn Notifier>,
    feed: Arc<KnowledgeFeed>,
    presentation: Arc<PresentationRenderer>,
    chat: Arc<RoomChatAggregator>,
    sender: OutboundSender,
    mounted: watch::Sender<bool>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    subscriptions: Vec<SubscriptionGuard>,
    presentation: Option<PresentationAttachment>,
    watchdog: Option<WatchdogHandle>,
}

impl SessionView {
    pub fn mount(
        room: Arc<dyn Room>,
        options: SessionOptions,
        updates: ViewUpdates,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let feed = Arc::new(KnowledgeFeed::with_capacity(options.feed_capacity));
        let feed_listener = Arc::new(KnowledgeFeedListener::new(
            Arc::clone(&feed),
            updates.clone(),
        ));
        let presentation = Arc::new(PresentationRenderer::new(
            options.presentation_topic.clone(),
            updates.clone(),
        ));
        let chat = Arc::new(RoomChatAggregator::new(Arc::clone(&room), updates.clone()));
        let sender = OutboundSender::new(chat.clone(), Arc::clone(&notifier), updates.clone());

        let subscriptions = vec![
            RoomSubscription::new(Arc::clone(&room), feed_listener).start(),
            RoomSubscription::new(Arc::clone(&room), chat.clone()).start(),
        ];
        let attachment = presentation.attach(Arc::clone(&room), notifier.as_ref());

        info!(
            room_id = %room.room_id(),
            presentation_attached = attachment.is_some(),
            "Session view mounted"
        );

        Self {
            room,
            options,
            updates,
            notifier,
            feed,
            presentation,
            chat,
            sender,
            mounted: watch::channel(true).0,
            lifecycle: Mutex::new(Lifecycle {
                subscriptions,
                presentation: attachment,
                watchdog: None,
            }),
        }
    }

    pub fn room_id(&self) -> &str {
        self.room.room_id()
    }

    pub fn updates(&self) -> &ViewUpdates {
        &self.updates
    }

    /// Marks the session started and arms the availability watchdog
    ///
    /// Returns false if the view is unmounted or already started.
    pub async fn start_session(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock().await;
        if !*self.mounted.borrow() || lifecycle.watchdog.is_some() {
            return false;
        }

        lifecycle.watchdog = Some(AvailabilityWatchdog::spawn(
            Arc::clone(&self.room),
            Arc::clone(&self.notifier),
            self.options.agent_ready_timeout,
        ));
        info!(room_id = %self.room_id(), "Session started");
        true
    }

    pub async fn is_started(&self) -> bool {
        self.lifecycle.lock().await.watchdog.is_some()
    }

    pub async fn is_mounted(&self) -> bool {
        let _lifecycle = self.lifecycle.lock().await;
        *self.mounted.borrow()
    }

    /// Flips to `false` once, when the view is unmounted
    pub fn watch_mounted(&self) -> watch::Receiver<bool> {
        self.mounted.subscribe()
    }

    pub async fn unmount(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if !*self.mounted.borrow() {
            return;
        }

        let released = lifecycle.subscriptions.len();
        *lifecycle = Lifecycle::default();
        self.mounted.send_replace(false);
        info!(
            room_id = %self.room_id(),
            subscriptions = released,
            "Session view unmounted"
        );
    }

    pub async fn feed(&self) -> Vec<KnowledgeMessage> {
        self.feed.entries().await
    }

    pub fn slide(&self) -> SlideContent {
        self.presentation.slide()
    }

    pub async fn chat_messages(&self) -> Vec<ChatMessage> {
        self.chat.messages().await
    }

    pub fn send_state(&self) -> SendState {
        self.sender.state()
    }

    pub async fn send_message(&self, text: &str) -> Result<ChatMessage, SendError> {
        if !*self.mounted.borrow() {
            debug!(room_id = %self.room_id(), "Dropping chat send on unmounted view");
            return Err(SendError::Unmounted);
        }
        self.sender.send(text).await
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            room_id: self.room_id().to_string(),
            connected: self.room.is_connected(),
            agent_state: self.room.agent_state(),
            session_started: self.is_started().await,
            feed: self.feed().await,
            slide: self.slide(),
            chat: self.chat_messages().await,
            send_state: self.send_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RoomEvent;
    use crate::room::LocalRoom;
    use crate::shared::test_utils::CollectingNotifier;

    fn mount(room: &Arc<LocalRoom>, notifier: &Arc<CollectingNotifier>) -> SessionView {
        SessionView::mount(
            room.clone(),
            SessionOptions::default(),
            ViewUpdates::new(),
            notifier.clone(),
        )
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_mount_claims_presentation_topic() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());

        let view = mount(&room, &notifier);

        assert!(view.is_mounted().await);
        assert_eq!(room.registered_topics(), vec!["presentation".to_string()]);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_unmount_releases_listeners_and_topic() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());
        let view = mount(&room, &notifier);

        view.unmount().await;
        settle().await;

        assert!(room.registered_topics().is_empty());
        assert_eq!(
            room.emit(RoomEvent::DataReceived {
                payload: br#"{"type":"knowledgeTransfer","narrative":"late"}"#.to_vec(),
                participant: None,
                topic: None,
            }),
            0
        );
        settle().await;
        assert!(view.feed().await.is_empty());
    }

    #[tokio::test]
    async fn test_start_session_only_arms_once() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());
        let view = mount(&room, &notifier);

        assert!(view.start_session().await);
        assert!(!view.start_session().await);
        assert!(view.is_started().await);

        view.unmount().await;
        assert!(!view.start_session().await);
    }

    #[tokio::test]
    async fn test_second_view_on_same_room_reports_topic_conflict() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());
        let _first = mount(&room, &notifier);

        let _second = mount(&room, &notifier);

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Presentation unavailable");
    }

    #[tokio::test]
    async fn test_send_after_unmount_is_rejected() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());
        let view = mount(&room, &notifier);
        let mut published = room.subscribe_published();

        view.unmount().await;

        assert_eq!(view.send_message("hello?").await, Err(SendError::Unmounted));
        assert!(published.try_recv().is_err());
        assert!(view.chat_messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_unmount_signals_watchers() {
        let room = Arc::new(LocalRoom::new("r1"));
        let notifier = Arc::new(CollectingNotifier::new());
        let view = mount(&room, &notifier);
        let mut mounted = view.watch_mounted();
        assert!(*mounted.borrow_and_update());

        view.unmount().await;

        mounted.changed().await.unwrap();
        assert!(!*mounted.borrow());
        assert!(!view.is_mounted().await);
    }
}
