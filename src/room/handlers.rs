use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, info, instrument};

use super::types::{AgentStateUpdate, BridgeAck};
use crate::chat::{ChatMessage, TranscriptionSegment};
use crate::event::RoomEvent;
use crate::shared::{AppError, AppState};

/// Header naming the participant a data packet came from
pub const PARTICIPANT_HEADER: &str = "x-participant-identity";
/// Header naming the data-channel topic of a packet
pub const DATA_TOPIC_HEADER: &str = "x-data-topic";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// HTTP handler for a data-channel packet
///
/// POST /bridge/rooms/{room_id}/data
/// The body is delivered to listeners byte for byte
#[instrument(name = "bridge_data", skip(state, headers, body))]
pub async fn ingest_data(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<BridgeAck> {
    let room = state.rooms.get_or_create(&room_id).await;
    let participant = header_value(&headers, PARTICIPANT_HEADER);
    let topic = header_value(&headers, DATA_TOPIC_HEADER);

    debug!(
        room_id = %room_id,
        bytes = body.len(),
        participant = ?participant,
        "Data packet bridged"
    );

    let delivered = room.emit(RoomEvent::DataReceived {
        payload: body.to_vec(),
        participant,
        topic,
    });
    Json(BridgeAck { delivered })
}

/// HTTP handler for a completed text stream
///
/// POST /bridge/rooms/{room_id}/streams/{topic}
/// Rejected when nothing in the room handles the topic
#[instrument(name = "bridge_text_stream", skip(state, headers, text))]
pub async fn ingest_text_stream(
    State(state): State<AppState>,
    Path((room_id, topic)): Path<(String, String)>,
    headers: HeaderMap,
    text: String,
) -> Result<Json<BridgeAck>, AppError> {
    let room = state.rooms.get_or_create(&room_id).await;
    if !room.registered_topics().contains(&topic) {
        return Err(AppError::NotFound(format!(
            "No text stream handler for topic {topic}"
        )));
    }

    let delivered = room.emit(RoomEvent::TextStreamReceived {
        topic,
        text,
        participant: header_value(&headers, PARTICIPANT_HEADER),
    });
    Ok(Json(BridgeAck { delivered }))
}

/// PUT /bridge/rooms/{room_id}/agent-state
#[instrument(name = "bridge_agent_state", skip(state))]
pub async fn update_agent_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(update): Json<AgentStateUpdate>,
) -> StatusCode {
    let room = state.rooms.get_or_create(&room_id).await;
    room.set_agent_state(update.state);
    StatusCode::NO_CONTENT
}

/// POST /bridge/rooms/{room_id}/transcriptions
#[instrument(name = "bridge_transcription", skip(state, segment))]
pub async fn ingest_transcription(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(segment): Json<TranscriptionSegment>,
) -> Json<BridgeAck> {
    let room = state.rooms.get_or_create(&room_id).await;
    let delivered = room.emit(RoomEvent::TranscriptionReceived { segment });
    Json(BridgeAck { delivered })
}

/// POST /bridge/rooms/{room_id}/chat
#[instrument(name = "bridge_chat", skip(state, message))]
pub async fn ingest_chat(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(message): Json<ChatMessage>,
) -> Json<BridgeAck> {
    let room = state.rooms.get_or_create(&room_id).await;
    info!(room_id = %room_id, message_id = %message.id, "Chat message bridged");
    let delivered = room.emit(RoomEvent::ChatReceived { message });
    Json(BridgeAck { delivered })
}
