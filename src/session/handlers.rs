use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::types::{SendChatRequest, StartSessionResponse};
use super::view::{SessionView, ViewSnapshot};
use crate::chat::ChatMessage;
use crate::feed::KnowledgeMessage;
use crate::presentation::SlideContent;
use crate::room::Room;
use crate::shared::{AppError, AppState};

async fn mounted_view(state: &AppState, room_id: &str) -> Result<Arc<SessionView>, AppError> {
    state
        .sessions
        .get(room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No session for room {room_id}")))
}

/// HTTP handler for starting a session
///
/// POST /rooms/{room_id}/session
/// Mounts the view if needed and arms the availability watchdog
#[instrument(name = "start_session", skip(state))]
pub async fn start_session(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<StartSessionResponse>, AppError> {
    let room = state.rooms.get_or_create(&room_id).await;
    let view = state.sessions.mount(room).await;
    let started = view.start_session().await;

    info!(room_id = %room_id, started = started, "Session start requested");

    Ok(Json(StartSessionResponse {
        started,
        snapshot: view.snapshot().await,
    }))
}

/// DELETE /rooms/{room_id}/session
#[instrument(name = "end_session", skip(state))]
pub async fn end_session(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.unmount(&room_id).await {
        // A closed room cannot host the next session
        if let Some(room) = state.rooms.get(&room_id).await {
            if !room.is_connected() {
                state.rooms.remove(&room_id).await;
            }
        }
        info!(room_id = %room_id, "Session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No session for room {room_id}")))
    }
}

/// GET /rooms/{room_id}/session
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ViewSnapshot>, AppError> {
    let view = mounted_view(&state, &room_id).await?;
    Ok(Json(view.snapshot().await))
}

/// GET /rooms/{room_id}/feed
#[instrument(name = "get_feed", skip(state))]
pub async fn get_feed(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<KnowledgeMessage>>, AppError> {
    let view = mounted_view(&state, &room_id).await?;
    Ok(Json(view.feed().await))
}

/// GET /rooms/{room_id}/slide
#[instrument(name = "get_slide", skip(state))]
pub async fn get_slide(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<SlideContent>, AppError> {
    let view = mounted_view(&state, &room_id).await?;
    Ok(Json(view.slide()))
}

/// GET /rooms/{room_id}/chat
#[instrument(name = "get_chat", skip(state))]
pub async fn get_chat(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let view = mounted_view(&state, &room_id).await?;
    Ok(Json(view.chat_messages().await))
}

/// HTTP handler for sending a chat line
///
/// POST /rooms/{room_id}/chat
/// Responds only after the room accepted or rejected the message
#[instrument(name = "send_chat", skip(state, request))]
pub async fn send_chat(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<SendChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let view = mounted_view(&state, &room_id).await?;
    let message = view.send_message(&request.message).await?;
    Ok(Json(message))
}
