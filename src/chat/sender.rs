use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::aggregator::ChatAggregator;
use super::models::ChatMessage;
use crate::notify::{Notification, Notifier};
use crate::room::RoomError;
use crate::session::{ViewUpdate, ViewUpdates};

/// Errors surfaced when a chat line could not be sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendError {
    #[error("Room error: {0}")]
    Room(#[from] RoomError),

    #[error("Failed to encode message: {0}")]
    Encode(String),

    #[error("Send failed: {0}")]
    Failed(String),

    #[error("Session view is no longer mounted")]
    Unmounted,
}

/// Progress of the most recent send, for locking and unlocking the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendState {
    Idle,
    Sending,
    Failed { error: String },
}

/// Pushes user-typed chat lines back through the room
pub struct OutboundSender {
    aggregator: Arc<dyn ChatAggregator>,
    notifier: Arc<dyn Notifier>,
    updates: ViewUpdates,
    state: watch::Sender<SendState>,
}

impl OutboundSender {
    pub fn new(
        aggregator: Arc<dyn ChatAggregator>,
        notifier: Arc<dyn Notifier>,
        updates: ViewUpdates,
    ) -> Self {
        let (state, _) = watch::channel(SendState::Idle);
        Self {
            aggregator,
            notifier,
            updates,
            state,
        }
    }

    /// Sends `text` and returns once the underlying send has settled
    ///
    /// The state reads `Sending` for the whole await. A failure leaves it at
    /// `Failed`, raises a notification, and is returned to the caller so the
    /// line can be retried.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, SendError> {
        self.set_state(SendState::Sending);

        match self.aggregator.send(text).await {
            Ok(message) => {
                debug!(message_id = %message.id, "Outbound message delivered");
                self.set_state(SendState::Idle);
                Ok(message)
            }
            Err(e) => {
                warn!(error = %e, "Outbound message failed");
                self.set_state(SendState::Failed {
                    error: e.to_string(),
                });
                self.notifier.notify(Notification::new(
                    "Message not sent",
                    format!("{e}. Try sending it again."),
                ));
                Err(e)
            }
        }
    }

    pub fn state(&self) -> SendState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<SendState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: SendState) {
        self.state.send_replace(state.clone());
        self.updates.publish(ViewUpdate::SendState { state });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{CollectingNotifier, ScriptedAggregator};

    #[tokio::test]
    async fn test_send_waits_for_underlying_send() {
        let (aggregator, release) = ScriptedAggregator::gated();
        let aggregator = Arc::new(aggregator);
        let sender = Arc::new(OutboundSender::new(
            aggregator.clone(),
            Arc::new(CollectingNotifier::new()),
            ViewUpdates::new(),
        ));

        let task = {
            let sender = sender.clone();
            tokio::spawn(async move { sender.send("hello").await })
        };

        // Underlying send is parked: the call must still be in flight
        aggregator.wait_for_calls(1).await;
        assert_eq!(sender.state(), SendState::Sending);
        assert!(!task.is_finished());

        release.send(Ok(())).unwrap();
        let message = task.await.unwrap().unwrap();

        assert_eq!(message.text, "hello");
        assert_eq!(sender.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn test_failed_send_is_surfaced() {
        let (aggregator, release) = ScriptedAggregator::gated();
        let notifier = Arc::new(CollectingNotifier::new());
        let sender = OutboundSender::new(
            Arc::new(aggregator),
            notifier.clone(),
            ViewUpdates::new(),
        );

        release
            .send(Err(SendError::Failed("network down".to_string())))
            .unwrap();
        let result = sender.send("hello").await;

        assert_eq!(
            result.unwrap_err(),
            SendError::Failed("network down".to_string())
        );
        assert!(matches!(sender.state(), SendState::Failed { .. }));

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Message not sent");
    }

    #[tokio::test]
    async fn test_send_state_is_pushed_as_view_updates() {
        let (aggregator, release) = ScriptedAggregator::gated();
        let updates = ViewUpdates::new();
        let mut receiver = updates.subscribe();
        let sender = OutboundSender::new(
            Arc::new(aggregator),
            Arc::new(CollectingNotifier::new()),
            updates,
        );

        release.send(Ok(())).unwrap();
        sender.send("hi").await.unwrap();

        let states: Vec<SendState> = [receiver.recv().await, receiver.recv().await]
            .into_iter()
            .map(|update| match update.unwrap() {
                ViewUpdate::SendState { state } => state,
                other => panic!("unexpected update {other:?}"),
            })
            .collect();
        assert_eq!(states, vec![SendState::Sending, SendState::Idle]);
    }
}
