use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::session::{SessionView, ViewUpdate};

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message from the client
    async fn handle_message(&self, room_id: &str, message: String);
}

#[derive(Debug)]
pub enum SocketError {
    ConnectionClosed,
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Binary/ping/pong carry nothing for the view
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// One browser client attached to a session view
///
/// The client is sent a full snapshot first, then every view update as it
/// happens. If the client falls behind the update channel it is resent a
/// snapshot instead of the updates it missed. Unmounting the view closes
/// the socket.
pub struct Connection {
    pub room_id: String,
    socket: Box<dyn SocketWrapper>,
    view: Arc<SessionView>,
    updates: broadcast::Receiver<ViewUpdate>,
    mounted: watch::Receiver<bool>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        socket: Box<dyn SocketWrapper>,
        view: Arc<SessionView>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        // Subscribe before the snapshot is taken so nothing falls in between
        let updates = view.updates().subscribe();
        let mounted = view.watch_mounted();
        Self {
            room_id: view.room_id().to_string(),
            socket,
            view,
            updates,
            mounted,
            message_handler,
        }
    }

    async fn send_update(&mut self, update: &ViewUpdate) -> Result<(), SocketError> {
        match serde_json::to_string(update) {
            Ok(frame) => self.socket.send_message(frame).await,
            Err(e) => {
                warn!(room_id = %self.room_id, error = %e, "Failed to encode view update");
                Ok(())
            }
        }
    }

    async fn send_snapshot(&mut self) -> Result<(), SocketError> {
        let snapshot = self.view.snapshot().await;
        self.send_update(&ViewUpdate::Snapshot { snapshot }).await
    }

    /// Run the connection - handles both sending and receiving until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        if !*self.mounted.borrow_and_update() {
            debug!(room_id = %self.room_id, "View already unmounted");
            let _ = self.socket.close().await;
            return Ok(());
        }
        self.send_snapshot().await?;

        loop {
            tokio::select! {
                mounted = self.mounted.changed() => {
                    if mounted.is_err() || !*self.mounted.borrow() {
                        debug!(room_id = %self.room_id, "View unmounted");
                        break;
                    }
                }

                // View updates (from the session to the client)
                update = self.updates.recv() => {
                    match update {
                        Ok(update) => self.send_update(&update).await?,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(
                                room_id = %self.room_id,
                                skipped = skipped,
                                "Client fell behind view updates, resending snapshot"
                            );
                            self.send_snapshot().await?;
                        }
                        Err(RecvError::Closed) => break,
                    }
                }

                // Client frames (from the client to the session)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => {
                            self.message_handler
                                .handle_message(&self.room_id, message)
                                .await;
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        debug!(room_id = %self.room_id, "Closing view socket");
        let _ = self.socket.close().await;
        Ok(())
    }
}
