use async_trait::async_trait;
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::messages::{ChatPayload, ClientMessage, ClientMessageType};
use super::socket::{Connection, MessageHandler};
use crate::session::SessionView;
use crate::shared::{AppError, AppState};

/// Routes client frames into the session view they are attached to
pub struct ViewMessageHandler {
    view: Arc<SessionView>,
}

impl ViewMessageHandler {
    pub fn new(view: Arc<SessionView>) -> Self {
        Self { view }
    }
}

#[async_trait]
impl MessageHandler for ViewMessageHandler {
    async fn handle_message(&self, room_id: &str, message: String) {
        let client_message = match serde_json::from_str::<ClientMessage>(&message) {
            Ok(client_message) => client_message,
            Err(e) => {
                warn!(room_id = %room_id, error = %e, "Failed to parse WebSocket message");
                return;
            }
        };

        match client_message.message_type {
            ClientMessageType::Chat => {
                let payload = match serde_json::from_value::<ChatPayload>(client_message.payload)
                {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(room_id = %room_id, error = %e, "Invalid CHAT payload");
                        return;
                    }
                };

                // Failures reach the client as SEND_STATE and NOTIFICATION updates
                if let Err(e) = self.view.send_message(&payload.content).await {
                    debug!(room_id = %room_id, error = %e, "Chat from socket not sent");
                }
            }
            ClientMessageType::Unsupported => {
                debug!(room_id = %room_id, message = %message, "Unhandled message type");
            }
        }
    }
}

/// WebSocket endpoint streaming a mounted session view
/// GET /ws/{room_id}
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    info!(room_id = %room_id, "WebSocket connection requested");

    let Some(view) = app_state.sessions.get(&room_id).await else {
        warn!(room_id = %room_id, "No session view, rejecting WebSocket connection");
        return Err(AppError::NotFound(format!("No session for room {room_id}")));
    };

    Ok(ws.on_upgrade(move |socket| handle_websocket_connection(socket, view)))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    view: Arc<SessionView>,
) {
    let room_id = view.room_id().to_string();
    info!(room_id = %room_id, "WebSocket connection established");

    let message_handler = Arc::new(ViewMessageHandler::new(Arc::clone(&view)));
    let connection = Connection::new(Box::new(socket), view, message_handler);

    match connection.run().await {
        Ok(()) => {
            info!(room_id = %room_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(room_id = %room_id, error = ?e, "WebSocket connection error");
        }
    }
}
