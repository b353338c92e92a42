use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::chat::{ChatMessage, SendState};
use crate::feed::KnowledgeMessage;
use crate::notify::{Notification, Notifier};
use crate::presentation::SlideContent;

use super::view::ViewSnapshot;

const UPDATES_CAPACITY: usize = 100;

/// A change to what a session view shows
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewUpdate {
    Snapshot { snapshot: ViewSnapshot },
    FeedAppended { message: KnowledgeMessage },
    SlideChanged { slide: SlideContent },
    ChatUpdated { message: ChatMessage },
    SendState { state: SendState },
    Notification { notification: Notification },
}

/// Fan-out of view updates to whoever renders the view
#[derive(Debug, Clone)]
pub struct ViewUpdates {
    sender: broadcast::Sender<ViewUpdate>,
}

impl ViewUpdates {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(UPDATES_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, update: ViewUpdate) {
        if self.sender.send(update).is_err() {
            debug!("View update published with no receivers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.sender.subscribe()
    }
}

impl Default for ViewUpdates {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ViewUpdates {
    fn notify(&self, notification: Notification) {
        warn!(
            title = %notification.title,
            description = %notification.description,
            "User notification raised"
        );
        self.publish(ViewUpdate::Notification { notification });
    }
}
