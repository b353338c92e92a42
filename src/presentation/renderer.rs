use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::slide::SlideContent;
use crate::event::{
    RoomEvent, RoomEventError, RoomEventHandler, RoomSubscription, SubscriptionGuard,
};
use crate::notify::{Notification, Notifier};
use crate::room::{Room, TopicRegistration};
use crate::session::{ViewUpdate, ViewUpdates};

/// Shows whatever slide last arrived on the presentation topic
///
/// Each completed text stream replaces the slide wholesale. There is no
/// sequence check, so a late stream overwrites a newer one.
pub struct PresentationRenderer {
    topic: String,
    slide: watch::Sender<SlideContent>,
    updates: ViewUpdates,
}

/// Keeps the renderer attached to a room; dropping it detaches
#[derive(Debug)]
pub struct PresentationAttachment {
    _registration: TopicRegistration,
    _subscription: SubscriptionGuard,
}

impl PresentationRenderer {
    pub fn new(topic: impl Into<String>, updates: ViewUpdates) -> Self {
        let (slide, _) = watch::channel(SlideContent::default());
        Self {
            topic: topic.into(),
            slide,
            updates,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Claims the topic on `room` and starts listening
    ///
    /// If the topic cannot be claimed the failure is logged and raised as a
    /// notification, and the renderer keeps showing its current slide.
    pub fn attach(
        self: &Arc<Self>,
        room: Arc<dyn Room>,
        notifier: &dyn Notifier,
    ) -> Option<PresentationAttachment> {
        let registration = match room.register_text_stream_handler(&self.topic) {
            Ok(registration) => registration,
            Err(e) => {
                warn!(
                    room_id = %room.room_id(),
                    topic = %self.topic,
                    error = %e,
                    "Failed to register presentation stream handler"
                );
                notifier.notify(Notification::new(
                    "Presentation unavailable",
                    e.to_string(),
                ));
                return None;
            }
        };

        let handler: Arc<dyn RoomEventHandler> = self.clone();
        let subscription = RoomSubscription::new(room, handler).start();

        Some(PresentationAttachment {
            _registration: registration,
            _subscription: subscription,
        })
    }

    pub fn slide(&self) -> SlideContent {
        self.slide.borrow().clone()
    }

    pub fn watch_slide(&self) -> watch::Receiver<SlideContent> {
        self.slide.subscribe()
    }

    fn render(&self, room_id: &str, text: &str) -> Result<(), RoomEventError> {
        let slide: SlideContent = serde_json::from_str(text)
            .map_err(|e| RoomEventError::InvalidPayload(format!("presentation slide: {e}")))?;

        info!(
            room_id = %room_id,
            heading = %slide.heading,
            bullets = slide.bullets.len(),
            "Presentation slide replaced"
        );

        self.slide.send_replace(slide.clone());
        self.updates.publish(ViewUpdate::SlideChanged { slide });
        Ok(())
    }
}

#[async_trait]
impl RoomEventHandler for PresentationRenderer {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        match event {
            RoomEvent::TextStreamReceived { topic, text, .. } if topic == self.topic => {
                self.render(room_id, &text)
            }
            RoomEvent::TextStreamReceived { topic, .. } => {
                debug!(room_id = %room_id, topic = %topic, "Ignoring text stream on other topic");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handler_name(&self) -> &'static str {
        "PresentationRenderer"
    }
}
